//! A collector that reports that the harness ran.
//!
//! Useful as a smoke test for a deployment: each push writes one status
//! document into a monthly index.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::{json, Map};
use tracing::warn;
use uuid::Uuid;

use harvest_pipeline::{Collector, CollectorSettings, DatePattern, RecordStream};
use harvest_shared::Record;

const MONTHLY: &str = "%Y.%m";

/// Emits a single status document per push.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    run_id: Uuid,
    bucket: Option<DatePattern>,
}

impl Heartbeat {
    pub fn new() -> Self {
        let bucket = match DatePattern::new(MONTHLY) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(error = %e, "Heartbeat index is not bucketed");
                None
            }
        };
        Self {
            run_id: Uuid::new_v4(),
            bucket,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector for Heartbeat {
    fn settings(&self) -> CollectorSettings {
        CollectorSettings {
            index_date_pattern: self.bucket.clone(),
            ..CollectorSettings::default()
        }
    }

    fn produce(&self) -> RecordStream<'_> {
        let mut source = Map::new();
        source.insert("@timestamp".to_string(), json!(Utc::now().to_rfc3339()));
        source.insert("run_id".to_string(), json!(self.run_id.to_string()));
        source.insert("version".to_string(), json!(env!("CARGO_PKG_VERSION")));

        let record = Record::new(source).with_id(self.run_id.to_string());
        stream::iter(vec![Ok(record)]).boxed()
    }

    fn estimated_count(&self) -> Option<u64> {
        Some(1)
    }
}
