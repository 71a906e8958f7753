//! Collector contract.
//!
//! A collector is a named unit of work that produces records. The harness
//! owns everything after production: naming, provisioning and writing.

mod settings;

pub use settings::{CollectorSettings, DatePattern, DEFAULT_ALIAS_SUFFIX, DEFAULT_CHUNK_SIZE};

use futures::stream::BoxStream;

use crate::errors::CollectorError;
use harvest_shared::Record;

/// Lazy stream of records produced by a collector.
pub type RecordStream<'a> = BoxStream<'a, Result<Record, CollectorError>>;

/// A producer of records.
///
/// # Example
///
/// ```ignore
/// struct Uptime;
///
/// impl Collector for Uptime {
///     fn produce(&self) -> RecordStream<'_> {
///         let mut source = serde_json::Map::new();
///         source.insert("uptime".to_string(), 42.into());
///         futures::stream::iter(vec![Ok(Record::new(source))]).boxed()
///     }
/// }
/// ```
pub trait Collector: Send + Sync {
    /// Index and batching settings for this collector.
    fn settings(&self) -> CollectorSettings {
        CollectorSettings::default()
    }

    /// Produce the records to write.
    ///
    /// The stream is consumed once per push and never collected in full, so
    /// collectors may produce arbitrarily many records.
    fn produce(&self) -> RecordStream<'_>;

    /// Quick estimate of how many records `produce` will yield.
    ///
    /// Only used for progress reporting. It must return in near-constant time:
    /// if the only way to count is to iterate everything `produce` would,
    /// return `None` instead.
    fn estimated_count(&self) -> Option<u64> {
        None
    }
}
