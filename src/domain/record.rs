//! Schema-less backend records.
//!
//! The backend emits a different object shape per module, so a [`Record`] is
//! an ordered list of named [`FieldValue`]s plus the identifier extracted from
//! the configured identifier field.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::domain::types::{IdentifierField, RecordId};

/// Closed set of values a record cell can hold.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// Text shown in a table cell. `Null` renders blank.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => number.to_string(),
            FieldValue::Bool(flag) => flag.to_string(),
            FieldValue::Null => String::new(),
        }
    }
}

impl From<Value> for FieldValue {
    /// Nested arrays and objects are kept as their compact JSON text.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Bool(flag),
            Value::Number(number) => FieldValue::Number(number),
            Value::String(text) => FieldValue::Text(text),
            nested @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(nested.to_string()),
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Reasons a JSON value cannot become a [`Record`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no usable `{0}` identifier")]
    MissingIdentifier(String),
}

/// One row of backend data.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    id: RecordId,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Builds a record from a JSON object, keeping the backend's key order.
    pub fn from_json(value: Value, identifier: &IdentifierField) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Self::from_map(map, identifier),
            _ => Err(RecordError::NotAnObject),
        }
    }

    fn from_map(map: Map<String, Value>, identifier: &IdentifierField) -> Result<Self, RecordError> {
        let fields: Vec<(String, FieldValue)> = map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect();

        let id = fields
            .iter()
            .find(|(key, _)| identifier.matches(key))
            .and_then(|(_, value)| match value {
                FieldValue::Text(text) => RecordId::new(text.as_str()).ok(),
                FieldValue::Number(number) => RecordId::new(number.to_string()).ok(),
                FieldValue::Bool(_) | FieldValue::Null => None,
            })
            .ok_or_else(|| RecordError::MissingIdentifier(identifier.to_string()))?;

        Ok(Self { id, fields })
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Field names in the backend's enumeration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == key)
            .map(|(_, value)| value)
    }

    /// Display text for `key`; missing keys render blank.
    pub fn display(&self, key: &str) -> String {
        self.get(key).map(FieldValue::display).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
