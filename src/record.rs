//! Denormalized records returned by listing queries

use crate::entity::EntityKind;
use rusqlite::types::ValueRef;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single cell of a listing row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One row of a listing: column name / value pairs in select order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Text of the named column, `None` for missing columns and non-text values
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of `list_with_relations`: an entity's rows joined with the
/// directly related entities, ordered by primary key
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub kind: EntityKind,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record whose primary key equals `id`
    pub fn find(&self, id: i64) -> Option<&Record> {
        let key = self.kind.id_column();
        self.records
            .iter()
            .find(|r| r.get(key).and_then(Value::as_i64) == Some(id))
    }
}

/// An entry of a foreign-key dropdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefOption {
    pub id: i64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lookup() {
        let record = Record::new(vec![
            ("person_id".to_string(), Value::Integer(1)),
            ("first_name".to_string(), Value::Text("Alice".to_string())),
            ("email".to_string(), Value::Null),
        ]);

        assert_eq!(record.get("person_id").and_then(Value::as_i64), Some(1));
        assert_eq!(record.text("first_name"), Some("Alice"));
        assert!(record.get("email").unwrap().is_null());
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn test_record_serializes_as_object() {
        let record = Record::new(vec![
            ("location_id".to_string(), Value::Integer(3)),
            ("latitude".to_string(), Value::Real(51.5)),
            ("note".to_string(), Value::Null),
        ]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"location_id": 3, "latitude": 51.5, "note": null})
        );
    }
}
