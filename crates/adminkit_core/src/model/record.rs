//! Record shape and identifier types.
//!
//! # Responsibility
//! - Represent one collection item as an ordered field → value mapping.
//! - Provide the shallow-merge primitive used by partial updates.
//!
//! # Invariants
//! - A record's identifier field is stable once assigned by the store.
//! - Merge is shallow: nested values are replaced wholesale, never deep-merged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Stable identifier for a record within one collection.
///
/// Collections keyed by serial integers and collections keyed by generated
/// uuid strings share this one type, so callers never branch on id shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Reads an identifier out of a raw JSON value, if it has an id shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Str(s.clone())),
            _ => None,
        }
    }

    /// Converts the identifier back into its JSON representation.
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Str(s) => Value::from(s.as_str()),
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Str(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Str(value)
    }
}

/// One item in a collection: an ordered mapping from field name to value.
///
/// Serialized transparently as a JSON object, so a persisted collection is a
/// flat array of objects with no wrapper noise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object value.
    ///
    /// Returns `None` when the value is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Returns the value stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Removes the value stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Returns the identifier stored under `id_field`, if present and id-shaped.
    pub fn id(&self, id_field: &str) -> Option<RecordId> {
        self.fields.get(id_field).and_then(RecordId::from_value)
    }

    /// Overlays `partial`'s fields onto this record.
    ///
    /// # Contract
    /// - Fields present in `partial` replace the existing value wholesale.
    /// - Fields absent from `partial` are preserved unchanged.
    pub fn merge(&mut self, partial: &Record) {
        for (name, value) in &partial.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Iterates field name/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
