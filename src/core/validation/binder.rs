//! Binding typed row models from raw request values

use super::ValidationState;
use crate::core::entity::{GridKey, GridRow};
use crate::core::field::FieldKind;
use crate::core::request::RequestValues;
use serde_json::{Map, Value};

/// A bound model with the errors found while binding it
#[derive(Debug, Clone)]
pub struct Bound<T> {
    pub model: T,
    pub state: ValidationState,
}

/// Capability to bind typed models from raw request values
pub trait Binder: Send + Sync {
    /// Bind a row model; binding never fails outright, errors land in the state
    fn bind<T: GridRow>(&self, values: &RequestValues) -> Bound<T>;

    /// Bind a single identity value
    fn bind_key<K: GridKey>(&self, values: &RequestValues, name: &str) -> Result<K, ValidationState> {
        let mut state = ValidationState::new();
        match values.get(name).map(str::trim).filter(|s| !s.is_empty()) {
            None => state.add_error(name, format!("The {} field is required", name)),
            Some(raw) => match raw.parse::<K>() {
                Ok(key) => return Ok(key),
                Err(_) => state.add_error(name, format!("'{}' is not a valid identity", raw)),
            },
        }
        Err(state)
    }
}

/// Binder driven by the row model's schema
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaBinder;

impl SchemaBinder {
    pub fn new() -> Self {
        Self
    }
}

impl Binder for SchemaBinder {
    fn bind<T: GridRow>(&self, values: &RequestValues) -> Bound<T> {
        let schema = T::schema();
        let mut state = ValidationState::new();
        let mut object = Map::new();

        for def in schema.fields() {
            let value = match values.get(def.name()) {
                None => Value::Null,
                Some(raw) => match coerce(def.kind(), raw) {
                    Ok(value) => value,
                    Err(message) => {
                        state.add_error(def.name(), message);
                        continue;
                    }
                },
            };

            for validator in def.validators() {
                if let Err(message) = validator(def.name(), &value) {
                    state.add_error(def.name(), message);
                }
            }

            if !value.is_null() {
                object.insert(def.name().to_string(), value);
            }
        }

        let model = match serde_json::from_value::<T>(Value::Object(object)) {
            Ok(model) => model,
            Err(e) => {
                state.add_error("", format!("Cannot bind {}: {}", schema.name(), e));
                T::default()
            }
        };

        Bound { model, state }
    }
}

/// Coerce a raw value to JSON by field kind
///
/// An empty value on a non-text field is treated as absent.
fn coerce(kind: FieldKind, raw: &str) -> Result<Value, String> {
    if !kind.is_text() && raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value = kind.parse(raw)?;
    serde_json::to_value(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::HasSchema;
    use crate::core::schema::{FieldDef, Schema};
    use crate::core::validation::validators::{positive, required};
    use serde::{Deserialize, Serialize};
    use std::sync::OnceLock;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct ItemRow {
        id: i64,
        name: String,
        price: f64,
        active: bool,
    }

    impl HasSchema for ItemRow {
        type Key = i64;

        fn schema() -> &'static Schema {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                Schema::builder("item")
                    .identity("id", FieldKind::Integer)
                    .def(FieldDef::new("name", FieldKind::String).validate(required()))
                    .def(FieldDef::new("price", FieldKind::Float).validate(positive()))
                    .field("active", FieldKind::Boolean)
                    .build()
            })
        }
    }

    impl GridRow for ItemRow {
        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_bind_valid_row() {
        let values = RequestValues::new()
            .with("id", "4")
            .with("name", "Bolt")
            .with("price", "2.5")
            .with("active", "true")
            .with("oper", "edit");
        let bound: Bound<ItemRow> = SchemaBinder.bind(&values);

        assert!(bound.state.is_valid());
        assert_eq!(bound.model.id, 4);
        assert_eq!(bound.model.name, "Bolt");
        assert_eq!(bound.model.price, 2.5);
        assert!(bound.model.active);
    }

    #[test]
    fn test_bind_reports_identity_error_separately() {
        let values = RequestValues::new()
            .with("id", "_empty")
            .with("name", "Nut")
            .with("price", "1");
        let bound: Bound<ItemRow> = SchemaBinder.bind(&values);

        assert!(!bound.state.is_valid());
        assert!(bound.state.has_errors("id"));
        assert!(bound.state.is_valid_except("id"));
        assert_eq!(bound.model.id, 0);
        assert_eq!(bound.model.name, "Nut");
    }

    #[test]
    fn test_bind_runs_validators() {
        let values = RequestValues::new().with("id", "1").with("price", "-3");
        let bound: Bound<ItemRow> = SchemaBinder.bind(&values);

        assert!(bound.state.has_errors("name"));
        assert!(bound.state.has_errors("price"));
        assert!(!bound.state.has_errors("id"));
    }

    #[test]
    fn test_empty_numeric_value_is_absent() {
        let values = RequestValues::new()
            .with("id", "1")
            .with("name", "Washer")
            .with("price", "");
        let bound: Bound<ItemRow> = SchemaBinder.bind(&values);

        assert!(bound.state.is_valid());
        assert_eq!(bound.model.price, 0.0);
    }

    #[test]
    fn test_bind_key() {
        let values = RequestValues::new().with("id", " 12 ");
        let key: i64 = SchemaBinder.bind_key(&values, "id").unwrap();
        assert_eq!(key, 12);

        let values = RequestValues::new().with("id", "twelve");
        let state = SchemaBinder.bind_key::<i64>(&values, "id").unwrap_err();
        assert!(state.has_errors("id"));

        let state = SchemaBinder
            .bind_key::<i64>(&RequestValues::new(), "id")
            .unwrap_err();
        assert!(state.has_errors("id"));
    }
}
