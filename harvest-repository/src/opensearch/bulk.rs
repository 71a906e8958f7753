//! Bulk request encoding and response decoding.
//!
//! A bulk body is newline-delimited JSON: one action line per record,
//! followed by the record's source line unless the operation is a delete.

use serde_json::{Map, Value};

use crate::errors::StoreError;
use harvest_shared::{BulkItemResponse, Record, ID_FIELD, INDEX_FIELD, TYPE_FIELD};

/// Build the action line for a record, e.g. `{"index": {"_index": "logs", "_id": "1"}}`.
pub(crate) fn action_line(record: &Record, document_types: bool) -> Value {
    let mut meta = Map::new();
    if let Some(ref index) = record.index {
        meta.insert(INDEX_FIELD.to_string(), Value::String(index.clone()));
    }
    if document_types {
        if let Some(ref doc_type) = record.doc_type {
            meta.insert(TYPE_FIELD.to_string(), Value::String(doc_type.clone()));
        }
    }
    if let Some(ref id) = record.id {
        meta.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    }

    let mut action = Map::new();
    action.insert(record.op.to_string(), Value::Object(meta));
    Value::Object(action)
}

/// Expand records into the lines of a bulk body.
pub(crate) fn encode(records: &[Record], document_types: bool) -> Vec<Value> {
    let mut lines = Vec::with_capacity(records.len() * 2);
    for record in records {
        lines.push(action_line(record, document_types));
        if record.op.has_source() {
            lines.push(Value::Object(record.source.clone()));
        }
    }
    lines
}

/// Decode a bulk response into one acknowledgement per submitted record.
pub(crate) fn decode(payload: Value, expected: usize) -> Result<Vec<BulkItemResponse>, StoreError> {
    let items = match payload {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(StoreError::parse("Bulk response has no items array")),
        },
        _ => return Err(StoreError::parse("Bulk response is not an object")),
    };

    if items.len() != expected {
        return Err(StoreError::parse(format!(
            "Bulk response carried {} items for {} records",
            items.len(),
            expected
        )));
    }

    items
        .into_iter()
        .map(|item| {
            let rendered = item.to_string();
            BulkItemResponse::from_value(item)
                .ok_or_else(|| StoreError::parse(format!("Unrecognised bulk item: {}", rendered)))
        })
        .collect()
}
