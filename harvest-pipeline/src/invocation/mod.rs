//! A single invocation of a collector.
//!
//! Binds a collector to a store client and a capture timestamp, from which
//! the destination index is resolved once for the whole push.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::classifier::Observer;
use crate::collector::Collector;
use crate::errors::PushError;
use crate::loader::{BulkLoader, LoaderConfig};
use crate::naming::IndexNaming;
use harvest_repository::IndexStore;
use harvest_shared::PushSummary;

/// A collector bound to a store and a capture timestamp.
pub struct CollectorRun {
    name: String,
    collector: Box<dyn Collector>,
    loader: BulkLoader,
    timestamp: DateTime<Utc>,
}

impl CollectorRun {
    /// Bind `collector`, registered as `name`, to `store`.
    ///
    /// The capture timestamp defaults to now.
    pub fn new(
        name: impl Into<String>,
        collector: Box<dyn Collector>,
        store: Arc<dyn IndexStore>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        let name = name.into();
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let settings = collector.settings();
        let naming = IndexNaming::resolve(&name, &settings, &timestamp);
        let loader = BulkLoader::with_config(
            store,
            naming,
            LoaderConfig {
                chunk_size: settings.chunk_size,
            },
        );

        Self {
            name,
            collector,
            loader,
            timestamp,
        }
    }

    /// Qualified name of the collector.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capture timestamp of this invocation.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Destination index of this invocation.
    pub fn index_name(&self) -> &str {
        self.loader.naming().index_name()
    }

    /// Alias repointed at the destination index, if any.
    pub fn alias(&self) -> Option<&str> {
        self.loader.naming().alias()
    }

    /// Records per bulk request.
    pub fn chunk_size(&self) -> usize {
        self.loader.config().chunk_size
    }

    /// The collector's own estimate of how many records it will produce.
    pub fn estimated_count(&self) -> Option<u64> {
        self.collector.estimated_count()
    }

    /// Collect and write every record.
    #[instrument(skip_all, fields(collector = %self.name))]
    pub async fn push<'a>(
        &'a self,
        observer: Option<&'a mut Observer<'a>>,
    ) -> Result<PushSummary, PushError> {
        self.loader.push(self.collector.produce(), observer).await
    }

    /// Collect every record without writing anything.
    #[instrument(skip_all, fields(collector = %self.name))]
    pub async fn dry_run_push<'a>(
        &'a self,
        observer: Option<&'a mut Observer<'a>>,
    ) -> Result<PushSummary, PushError> {
        self.loader
            .dry_run_push(self.collector.produce(), observer)
            .await
    }
}
