//! Model binding and validation
//!
//! The engine consumes a [`Binder`] to turn raw request values into typed
//! row models. The default [`SchemaBinder`] coerces each value by the kind
//! its row schema declares, runs the field validators attached to the
//! schema, and deserializes the result with serde.

pub mod binder;
pub mod validators;

pub use binder::{Binder, Bound, SchemaBinder};

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Per-field binding errors
///
/// Errors that do not belong to a single field are recorded under the empty
/// field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationState {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a field
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// True when no field has errors
    pub fn is_valid(&self) -> bool {
        self.errors.values().all(Vec::is_empty)
    }

    /// True when no field other than `ignored` has errors
    pub fn is_valid_except(&self, ignored: &str) -> bool {
        self.errors
            .iter()
            .filter(|(field, _)| field.as_str() != ignored)
            .all(|(_, messages)| messages.is_empty())
    }

    pub fn has_errors(&self, field: &str) -> bool {
        self.errors.get(field).is_some_and(|m| !m.is_empty())
    }

    /// Messages recorded for one field
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every field with its messages, in the order they were first reported
    pub fn errors(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(f, m)| (f.as_str(), m.as_slice()))
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.errors() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                if field.is_empty() {
                    write!(f, "{}", message)?;
                } else {
                    write!(f, "{}: {}", field, message)?;
                }
            }
        }
        Ok(())
    }
}
