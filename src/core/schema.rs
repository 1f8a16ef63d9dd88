//! Explicit per-type schemas
//!
//! A [`Schema`] declares the fields of a row model or record type: their
//! kinds, whether they take part in implicit search, which one carries the
//! identity, per-field validators, and logical→physical field aliases.
//! Schemas are built once, typically inside a `OnceLock`, and shared by every
//! request.

use crate::core::field::FieldKind;
use crate::core::validation::validators::FieldValidator;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Declaration of one field
#[derive(Clone)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    searchable: bool,
    validators: Vec<FieldValidator>,
}

impl FieldDef {
    /// Declare a searchable field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            searchable: true,
            validators: Vec::new(),
        }
    }

    /// Exclude the field from implicit per-field search
    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Attach a validator run by the binder
    pub fn validate(
        mut self,
        validator: impl Fn(&str, &serde_json::Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn validators(&self) -> &[FieldValidator] {
        &self.validators
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("searchable", &self.searchable)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Field layout of a row model or record type
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDef>,
    identity: Option<String>,
    aliases: IndexMap<String, String>,
}

impl Schema {
    /// Start declaring a schema for the named type
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name: name.into(),
                fields: Vec::new(),
                identity: None,
                aliases: IndexMap::new(),
            },
        }
    }

    /// Type name, used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by its physical name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The first declared field, used as the default sort key
    pub fn first_field(&self) -> Option<&FieldDef> {
        self.fields.first()
    }

    /// Name of the identity field, if one was declared
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Map a logical field name to its physical name
    pub fn resolve<'a>(&'a self, logical: &'a str) -> &'a str {
        self.aliases
            .get(logical)
            .map(String::as_str)
            .unwrap_or(logical)
    }

    /// Resolve a logical field name through the alias map and look it up
    pub fn resolve_field(&self, logical: &str) -> Option<&FieldDef> {
        self.field(self.resolve(logical))
    }

    /// Fields taking part in implicit search
    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.searchable)
    }
}

/// Builder for [`Schema`]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare the identity field
    pub fn identity(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        self.schema.identity = Some(name.clone());
        self.schema.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Declare a plain searchable field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.schema.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Declare a field with options
    pub fn def(mut self, def: FieldDef) -> Self {
        self.schema.fields.push(def);
        self
    }

    /// Map a logical field name used by clients to a physical field name
    pub fn alias(mut self, logical: impl Into<String>, physical: impl Into<String>) -> Self {
        self.schema.aliases.insert(logical.into(), physical.into());
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}
