//! Per-item outcomes of a push and their aggregate.

use serde_json::{json, Map, Value};

use crate::record::{OpType, Record};

/// Acknowledgement the store returned for one submitted record.
///
/// `body` is the payload the store reported under the operation key, kept
/// verbatim so failures can be reported exactly as the store described them.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResponse {
    /// Operation the acknowledgement refers to.
    pub op: OpType,
    /// Payload reported by the store (`status`, `_index`, `_id`, `error`, ...).
    pub body: Map<String, Value>,
}

impl BulkItemResponse {
    /// Build an acknowledgement with the given status code.
    pub fn new(op: OpType, status: u16) -> Self {
        let mut body = Map::new();
        body.insert("status".to_string(), json!(status));
        Self { op, body }
    }

    /// Attach an error body.
    pub fn with_error(mut self, error: Value) -> Self {
        self.body.insert("error".to_string(), error);
        self
    }

    /// Attach the document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.body.insert("_id".to_string(), Value::String(id.into()));
        self
    }

    /// Attach the index name.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.body.insert("_index".to_string(), Value::String(index.into()));
        self
    }

    /// Parse one entry of a bulk response `items` array, e.g.
    /// `{"index": {"_id": "1", "status": 201}}`.
    ///
    /// Returns `None` if the entry does not have exactly one known operation key
    /// holding an object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        if map.len() != 1 {
            return None;
        }
        let (key, inner) = map.into_iter().next()?;
        let op = key.parse().ok()?;
        match inner {
            Value::Object(body) => Some(Self { op, body }),
            _ => None,
        }
    }

    /// Status code the store reported for this item.
    pub fn status(&self) -> Option<u16> {
        self.body
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Error body the store reported for this item, if any.
    pub fn error(&self) -> Option<&Value> {
        self.body.get("error")
    }

    /// Document id the store reported.
    pub fn id(&self) -> Option<&str> {
        self.body.get("_id").and_then(Value::as_str)
    }

    /// Index the store wrote to.
    pub fn index(&self) -> Option<&str> {
        self.body.get("_index").and_then(Value::as_str)
    }

    /// Raw outcome as the store reports it: a 2xx status.
    pub fn is_success(&self) -> bool {
        matches!(self.status(), Some(200..=299))
    }

    /// Render the acknowledgement in its wire form, `{"<op>": {...}}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.op.to_string(), Value::Object(self.body.clone()));
        Value::Object(map)
    }
}

/// The item handed to a push observer.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// A record that a dry run would have written.
    Previewed(Record),
    /// The store's acknowledgement for a written record.
    Acknowledged(BulkItemResponse),
}

/// Result of a push: how many records succeeded and which ones failed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PushSummary {
    /// Number of records counted as successful.
    pub succeeded: usize,
    /// Acknowledgements of records that failed, in stream order.
    pub failures: Vec<BulkItemResponse>,
}

impl PushSummary {
    /// Number of failed records.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total number of records processed.
    pub fn total(&self) -> usize {
        self.succeeded + self.failures.len()
    }

    /// Whether every record succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
