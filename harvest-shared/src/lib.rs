//! # Harvest Shared
//!
//! Shared types used across the harvest crates: the records collectors
//! produce, and the per-item outcomes the store reports back for them.

mod outcome;
mod record;

pub use outcome::{BulkItemResponse, ItemOutcome, PushSummary};
pub use record::{OpType, Record, RecordError, ID_FIELD, INDEX_FIELD, OP_TYPE_FIELD, TYPE_FIELD};
