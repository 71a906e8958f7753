//! Records produced by collectors.
//!
//! A record is one document to write plus the metadata that routes the write:
//! destination index, document type, optional document id and the bulk
//! operation to perform.

use std::fmt;
use std::str::FromStr;

use serde::de::value::StrDeserializer;
use serde::de::{self, IntoDeserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Metadata field carrying the destination index in raw JSON records.
pub const INDEX_FIELD: &str = "_index";
/// Metadata field carrying the document type in raw JSON records.
pub const TYPE_FIELD: &str = "_type";
/// Metadata field carrying the document id in raw JSON records.
pub const ID_FIELD: &str = "_id";
/// Metadata field carrying the bulk operation in raw JSON records.
pub const OP_TYPE_FIELD: &str = "_op_type";

/// Errors raised when converting raw JSON into a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The raw value was not a JSON object.
    #[error("Record must be a JSON object, got {0}")]
    NotAnObject(String),

    /// The `_op_type` field named an unknown operation.
    #[error("Unknown operation type: {0}")]
    UnknownOpType(String),

    /// A metadata field held something other than a string.
    #[error("Metadata field {0} must be a string")]
    InvalidMetadata(String),
}

/// Bulk operation performed for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    /// Create or replace the document.
    #[default]
    Index,
    /// Create the document, failing if it already exists.
    Create,
    /// Partially update an existing document.
    Update,
    /// Delete the document.
    Delete,
}

impl OpType {
    /// Whether the operation is followed by a source line in a bulk body.
    pub fn has_source(&self) -> bool {
        !matches!(self, OpType::Delete)
    }
}

/// Writes the name used on the bulk wire protocol (`index`, `update`, ...).
impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_value(self).map_err(|_| fmt::Error)? {
            Value::String(name) => f.write_str(&name),
            _ => Err(fmt::Error),
        }
    }
}

impl FromStr for OpType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: StrDeserializer<'_, de::value::Error> = s.into_deserializer();
        OpType::deserialize(name).map_err(|_| RecordError::UnknownOpType(s.to_string()))
    }
}

/// A single document to write, with its write-routing metadata.
///
/// `index` and `doc_type` are usually left unset by collectors; the pipeline
/// fills them in before the record reaches the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Destination index.
    pub index: Option<String>,
    /// Document type (category) of the record.
    pub doc_type: Option<String>,
    /// Explicit document id. The store assigns one when absent.
    pub id: Option<String>,
    /// Bulk operation to perform.
    pub op: OpType,
    /// Document body. For updates this is the full update body (`doc`, `script`, ...).
    pub source: Map<String, Value>,
}

impl Record {
    /// Create an `index` record for the given document body.
    pub fn new(source: Map<String, Value>) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Create a `delete` record for the given document id.
    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            op: OpType::Delete,
            ..Default::default()
        }
    }

    /// Set the destination index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the document type.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the bulk operation.
    pub fn with_op(mut self, op: OpType) -> Self {
        self.op = op;
        self
    }

    /// Render the record back into its raw JSON form, metadata included.
    pub fn to_value(&self) -> Value {
        let mut map = self.source.clone();
        if let Some(ref index) = self.index {
            map.insert(INDEX_FIELD.to_string(), Value::String(index.clone()));
        }
        if let Some(ref doc_type) = self.doc_type {
            map.insert(TYPE_FIELD.to_string(), Value::String(doc_type.clone()));
        }
        if let Some(ref id) = self.id {
            map.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        }
        if self.op != OpType::Index {
            map.insert(
                OP_TYPE_FIELD.to_string(),
                Value::String(self.op.to_string()),
            );
        }
        Value::Object(map)
    }
}

fn take_string(map: &mut Map<String, Value>, field: &str) -> Result<Option<String>, RecordError> {
    match map.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        // numeric ids are common enough to accept
        Some(Value::Number(n)) if field == ID_FIELD => Ok(Some(n.to_string())),
        Some(_) => Err(RecordError::InvalidMetadata(field.to_string())),
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    /// Split a raw JSON object into metadata (`_index`, `_type`, `_id`,
    /// `_op_type`) and document body.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Err(RecordError::NotAnObject(other.to_string())),
        };

        let index = take_string(&mut map, INDEX_FIELD)?;
        let doc_type = take_string(&mut map, TYPE_FIELD)?;
        let id = take_string(&mut map, ID_FIELD)?;
        let op = match map.remove(OP_TYPE_FIELD) {
            None | Some(Value::Null) => OpType::Index,
            Some(Value::String(name)) => serde_json::from_value(Value::String(name.clone()))
                .map_err(|_| RecordError::UnknownOpType(name))?,
            Some(_) => return Err(RecordError::InvalidMetadata(OP_TYPE_FIELD.to_string())),
        };

        Ok(Self {
            index,
            doc_type,
            id,
            op,
            source: map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_try_from_splits_metadata() {
        let record = Record::try_from(json!({
            "_index": "metrics",
            "_id": 42,
            "_op_type": "update",
            "doc": {"k": 1}
        }))
        .unwrap();

        assert_eq!(record.index.as_deref(), Some("metrics"));
        assert_eq!(record.id.as_deref(), Some("42"));
        assert_eq!(record.op, OpType::Update);
        assert!(record.doc_type.is_none());
        assert_eq!(Value::Object(record.source), json!({"doc": {"k": 1}}));
    }

    #[test]
    fn test_try_from_defaults_to_index() {
        let record = Record::try_from(json!({"k": 1})).unwrap();

        assert_eq!(record.op, OpType::Index);
        assert!(record.index.is_none());
        assert!(record.id.is_none());
    }

    #[test]
    fn test_try_from_rejects_non_object() {
        let result = Record::try_from(json!([1, 2]));
        assert!(matches!(result, Err(RecordError::NotAnObject(_))));
    }

    #[test]
    fn test_try_from_rejects_unknown_op() {
        let result = Record::try_from(json!({"_op_type": "upsert"}));
        assert_eq!(result, Err(RecordError::UnknownOpType("upsert".to_string())));
    }

    #[test]
    fn test_try_from_rejects_non_string_index() {
        let result = Record::try_from(json!({"_index": 3}));
        assert_eq!(
            result,
            Err(RecordError::InvalidMetadata(INDEX_FIELD.to_string()))
        );
    }

    #[test]
    fn test_to_value_restores_metadata() {
        let record = Record::delete("abc").with_index("logs").with_doc_type("status");

        assert_eq!(
            record.to_value(),
            json!({"_index": "logs", "_type": "status", "_id": "abc", "_op_type": "delete"})
        );
    }

    #[test]
    fn test_op_type_wire_names() {
        let cases = [
            (OpType::Index, "index"),
            (OpType::Create, "create"),
            (OpType::Update, "update"),
            (OpType::Delete, "delete"),
        ];

        for (op, name) in cases {
            assert_eq!(serde_json::to_value(op).unwrap(), json!(name));
            assert_eq!(serde_json::from_value::<OpType>(json!(name)).unwrap(), op);
            assert_eq!(op.to_string(), name);
            assert_eq!(name.parse::<OpType>().unwrap(), op);
        }
    }

    #[test]
    fn test_op_type_rejects_unknown_name() {
        assert_eq!(
            "upsert".parse::<OpType>(),
            Err(RecordError::UnknownOpType("upsert".to_string()))
        );
        assert!(serde_json::from_value::<OpType>(json!("Index")).is_err());
    }

    #[test]
    fn test_try_from_rejects_non_string_op() {
        let result = Record::try_from(json!({"_op_type": 1}));
        assert_eq!(
            result,
            Err(RecordError::InvalidMetadata(OP_TYPE_FIELD.to_string()))
        );
    }

    #[test]
    fn test_op_type_has_source() {
        assert!(OpType::Index.has_source());
        assert!(OpType::Update.has_source());
        assert!(!OpType::Delete.has_source());
    }
}
