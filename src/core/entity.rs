//! Record and row model traits
//!
//! A *record* is the persisted shape a data source stores. A *row model* is
//! the shape exchanged with the grid: it is bound from request values on
//! mutations and serialized into the `cell` of each listed row.
//!
//! Two kinds of row models exist:
//! - a simple row that is itself the record (implement [`Record`] and
//!   [`GridRow`] on the same type; [`RowModel`] is then provided), and
//! - an adapting row, a view model translating to and from a separate record
//!   type by implementing [`RowModel`] for it.

use crate::core::field::FieldValue;
use crate::core::schema::Schema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Identity types usable as grid row ids
///
/// Keys are rendered with `Display` for the `id` of listed rows and the
/// `rowid` of add acknowledgments, and parsed with `FromStr` from the request
/// on deletes.
pub trait GridKey: Clone + fmt::Display + FromStr + PartialEq + Send + Sync + 'static {}

impl<T> GridKey for T where T: Clone + fmt::Display + FromStr + PartialEq + Send + Sync + 'static {}

/// Types described by a [`Schema`]
pub trait HasSchema {
    /// Identity type
    type Key: GridKey;

    /// The schema of this type, built once and shared
    fn schema() -> &'static Schema;
}

/// A persisted record
pub trait Record: HasSchema + Clone + Send + Sync + 'static {
    /// Get the identity of this record
    fn key(&self) -> Self::Key;

    /// Get the value of a field by its physical name
    ///
    /// Returns `None` for names the record does not know; nullable fields
    /// that are unset return `Some(FieldValue::Null)`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// A row model exchanged with the grid
///
/// Row models are deserialized by the binder from coerced request values,
/// so their fields should carry `#[serde(default)]` for values a request may
/// omit (the identity on add, for instance).
pub trait GridRow: HasSchema + Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Get the identity of this row
    fn id(&self) -> Self::Key;
}

/// Translation between a row model and the record it represents
pub trait RowModel<R>: GridRow {
    /// Fill this row from a record
    fn copy_from(&mut self, source: &R);

    /// Write this row onto a record
    fn apply_to(&self, dest: &mut R);
}

impl<T> RowModel<T> for T
where
    T: Record + GridRow,
{
    fn copy_from(&mut self, source: &T) {
        *self = source.clone();
    }

    fn apply_to(&self, dest: &mut T) {
        *dest = self.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldKind;
    use serde::Deserialize;
    use std::sync::OnceLock;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Tag {
        id: i64,
        label: String,
    }

    impl HasSchema for Tag {
        type Key = i64;

        fn schema() -> &'static Schema {
            static SCHEMA: OnceLock<Schema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                Schema::builder("tag")
                    .identity("id", FieldKind::Integer)
                    .field("label", FieldKind::String)
                    .build()
            })
        }
    }

    impl Record for Tag {
        fn key(&self) -> i64 {
            self.id
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "label" => Some(self.label.as_str().into()),
                _ => None,
            }
        }
    }

    impl GridRow for Tag {
        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_simple_row_copies_itself() {
        let source = Tag {
            id: 7,
            label: "rust".to_string(),
        };
        let mut row = Tag::default();
        row.copy_from(&source);
        assert_eq!(row, source);

        let mut dest = Tag::default();
        row.apply_to(&mut dest);
        assert_eq!(dest, source);
    }

    #[test]
    fn test_field_value_lookup() {
        let tag = Tag {
            id: 1,
            label: "db".to_string(),
        };
        assert_eq!(tag.field_value("label"), Some(FieldValue::String("db".into())));
        assert_eq!(tag.field_value("unknown"), None);
        assert_eq!(<Tag as HasSchema>::schema().name(), "tag");
    }
}
