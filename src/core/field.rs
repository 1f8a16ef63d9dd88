//! Field value types, kinds and comparisons

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

/// The declared type of a field
///
/// String fields accept the text search operators; every other kind is
/// compared with the relational operators only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Uuid,
    DateTime,
}

impl FieldKind {
    /// Whether text operators (begins with, contains, ...) apply
    pub fn is_text(self) -> bool {
        matches!(self, FieldKind::String)
    }

    /// Parse a raw request value into a typed value of this kind
    pub fn parse(self, raw: &str) -> Result<FieldValue, String> {
        match self {
            FieldKind::String => Ok(FieldValue::String(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| format!("'{}' is not a valid integer", raw)),
            FieldKind::Float => raw
                .trim()
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| format!("'{}' is not a valid number", raw)),
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Ok(FieldValue::Boolean(true)),
                "false" | "off" | "0" => Ok(FieldValue::Boolean(false)),
                _ => Err(format!("'{}' is not a valid boolean", raw)),
            },
            FieldKind::Uuid => Uuid::parse_str(raw.trim())
                .map(FieldValue::Uuid)
                .map_err(|_| format!("'{}' is not a valid UUID", raw)),
            FieldKind::DateTime => parse_datetime(raw.trim())
                .map(FieldValue::DateTime)
                .ok_or_else(|| format!("'{}' is not a valid date", raw)),
        }
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Compare two values of compatible kinds
    ///
    /// Integers and floats compare numerically with each other. Values of
    /// unrelated kinds, and nulls, are incomparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: nulls first, then by value
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Uuid(u) => write!(f, "{}", u),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(FieldValue::Integer(7).as_string(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::from(None::<i64>);
        assert!(value.is_null());
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(FieldKind::Integer.parse(" 42 "), Ok(FieldValue::Integer(42)));
        assert!(FieldKind::Integer.parse("forty").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(FieldKind::Boolean.parse("True"), Ok(FieldValue::Boolean(true)));
        assert_eq!(FieldKind::Boolean.parse("off"), Ok(FieldValue::Boolean(false)));
        assert!(FieldKind::Boolean.parse("maybe").is_err());
    }

    #[test]
    fn test_parse_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(FieldKind::Uuid.parse(&id.to_string()), Ok(FieldValue::Uuid(id)));
        assert!(FieldKind::Uuid.parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = FieldKind::DateTime.parse("2024-03-01").expect("date should parse");
        let FieldValue::DateTime(dt) = parsed else {
            panic!("expected a datetime");
        };
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_string_keeps_raw_text() {
        assert_eq!(
            FieldKind::String.parse("  padded "),
            Ok(FieldValue::String("  padded ".to_string()))
        );
    }

    #[test]
    fn test_compare_mixed_numbers() {
        let a = FieldValue::Integer(3);
        let b = FieldValue::Float(3.5);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(b.compare(&a), Some(Ordering::Greater));
    }

    #[test]
    fn test_compare_unrelated_kinds() {
        let a = FieldValue::Integer(3);
        let b = FieldValue::String("3".to_string());
        assert_eq!(a.compare(&b), None);
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), None);
    }

    #[test]
    fn test_sort_cmp_nulls_first() {
        assert_eq!(
            FieldValue::Null.sort_cmp(&FieldValue::Integer(1)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Integer(2).sort_cmp(&FieldValue::Integer(1)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_serde_roundtrip_string() {
        let original = FieldValue::String("hello".to_string());
        let json = serde_json::to_string(&original).expect("serialize should succeed");
        let restored: FieldValue =
            serde_json::from_str(&json).expect("deserialize should succeed");
        assert_eq!(original, restored);
    }
}
