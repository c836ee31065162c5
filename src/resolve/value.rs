use super::relation::{RelationMany, RelationOne};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A row returned by the store, read field by field during resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    #[must_use]
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Builds an item from a JSON object; anything else yields `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(columns) => Some(Self(columns)),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// The item's identifier, or `null` when the row carries none.
    #[must_use]
    pub fn id(&self) -> Value {
        self.0.get("id").cloned().unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Item {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}

/// What a field resolves to: a plain value or a capability the query
/// executor invokes later.
#[derive(Clone)]
pub enum ResolvedValue {
    Value(Value),
    Many(RelationMany),
    One(RelationOne),
}

impl ResolvedValue {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ResolvedValue::Value(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            ResolvedValue::Value(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_many(&self) -> Option<&RelationMany> {
        match self {
            ResolvedValue::Many(many) => Some(many),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_one(&self) -> Option<&RelationOne> {
        match self {
            ResolvedValue::One(one) => Some(one),
            _ => None,
        }
    }
}

impl From<Value> for ResolvedValue {
    fn from(value: Value) -> Self {
        ResolvedValue::Value(value)
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            ResolvedValue::Many(many) => f.debug_tuple("Many").field(many).finish(),
            ResolvedValue::One(one) => f.debug_tuple("One").field(one).finish(),
        }
    }
}
