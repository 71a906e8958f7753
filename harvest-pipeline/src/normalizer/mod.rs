//! Record normalization.
//!
//! Stamps every record with its destination index and a document type
//! before it is written. Records already carrying either keep their value.

use futures::{Stream, TryStreamExt};

use crate::errors::CollectorError;
use harvest_shared::Record;

/// Document type given to records that do not carry one.
pub const DEFAULT_DOC_TYPE: &str = "status";

/// Fill in the destination index and document type of a single record.
pub fn stamp(mut record: Record, index_name: &str) -> Record {
    if record.doc_type.is_none() {
        record.doc_type = Some(DEFAULT_DOC_TYPE.to_string());
    }
    if record.index.is_none() {
        record.index = Some(index_name.to_string());
    }
    record
}

/// Stamp every record of a stream.
///
/// Order is preserved and the stream stays lazy: each record is stamped as it
/// is pulled, nothing is read ahead. Producer errors pass through untouched.
pub fn normalize<'a, S>(
    records: S,
    index_name: String,
) -> impl Stream<Item = Result<Record, CollectorError>> + Send + 'a
where
    S: Stream<Item = Result<Record, CollectorError>> + Send + 'a,
{
    records.map_ok(move |record| stamp(record, &index_name))
}
