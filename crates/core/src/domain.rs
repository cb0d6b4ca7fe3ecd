use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Attribute name added to a record right before it is persisted
pub const TIMESTAMP_FIELD: &str = "Timestamp";

/// Schema-less payload carried through the pipeline.
///
/// Keys keep the order in which upstream sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Builds a record from a decoded JSON value; only objects are accepted
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sets the `Timestamp` attribute, replacing any value upstream sent under that key
    pub fn stamp(&mut self, at: DateTime<Utc>) {
        self.fields.insert(
            TIMESTAMP_FIELD.to_string(),
            Value::String(crate::utils::format_rfc3339(at)),
        );
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.fields.get(TIMESTAMP_FIELD).and_then(Value::as_str)
    }
}

/// One of the three sequential steps of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Notify,
    Record,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Notify => write!(f, "notify"),
            Stage::Record => write!(f, "record"),
        }
    }
}
