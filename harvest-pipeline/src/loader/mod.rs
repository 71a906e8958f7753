//! Bulk write engine.
//!
//! Consumes a record stream, groups it into bounded batches, submits each
//! batch as one bulk request and streams back one outcome per record. At most
//! one batch is held in memory, whatever the length of the stream.

use std::pin::pin;
use std::sync::Arc;

use futures::stream::{self, TryChunksError};
use futures::{Stream, TryStreamExt};
use tracing::{debug, info, instrument};

use crate::classifier::{Observer, OutcomeAccumulator};
use crate::collector::{RecordStream, DEFAULT_CHUNK_SIZE};
use crate::errors::{CollectorError, PushError};
use crate::naming::IndexNaming;
use crate::normalizer::normalize;
use crate::provisioner::ensure_index;
use harvest_repository::IndexStore;
use harvest_shared::{BulkItemResponse, PushSummary, Record};

/// Submit records in batches of at most `chunk_size` and yield
/// `(raw_ok, acknowledgement)` per record, in stream order.
///
/// Item-level failures are yielded as data. A producer error or a failed bulk
/// request ends the stream with an error; records buffered for the batch in
/// progress are not submitted.
pub fn streaming_bulk<'a, S>(
    store: &'a dyn IndexStore,
    records: S,
    chunk_size: usize,
) -> impl Stream<Item = Result<(bool, BulkItemResponse), PushError>> + Send + 'a
where
    S: Stream<Item = Result<Record, CollectorError>> + Send + 'a,
{
    records
        .map_err(PushError::Collector)
        .try_chunks(chunk_size.max(1))
        .map_err(|TryChunksError(_, e)| e)
        .and_then(move |batch| async move {
            debug!(batch_size = batch.len(), "Submitting bulk request");
            store.bulk(&batch).await.map_err(PushError::Transport)
        })
        .map_ok(|items| {
            stream::iter(
                items
                    .into_iter()
                    .map(|item| Ok::<_, PushError>((item.is_success(), item))),
            )
        })
        .try_flatten()
}

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum number of records per bulk request.
    pub chunk_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Loader that writes a collector's records into its destination index.
pub struct BulkLoader {
    store: Arc<dyn IndexStore>,
    naming: IndexNaming,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a loader writing to the index resolved by `naming`.
    pub fn new(store: Arc<dyn IndexStore>, naming: IndexNaming) -> Self {
        Self {
            store,
            naming,
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(
        store: Arc<dyn IndexStore>,
        naming: IndexNaming,
        config: LoaderConfig,
    ) -> Self {
        Self {
            store,
            naming,
            config,
        }
    }

    /// Names this loader writes to.
    pub fn naming(&self) -> &IndexNaming {
        &self.naming
    }

    /// Batching configuration of this loader.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Provision the index, then write every record.
    ///
    /// # Returns
    ///
    /// * `Ok(PushSummary)` - Successes and item-level failures
    /// * `Err(PushError)` - If provisioning, a bulk request or the producer failed.
    ///   Outcomes already reported to the observer stand; no summary is returned.
    #[instrument(skip_all, fields(index = %self.naming.index_name()))]
    pub async fn push<'a>(
        &self,
        records: RecordStream<'a>,
        observer: Option<&'a mut Observer<'a>>,
    ) -> Result<PushSummary, PushError> {
        ensure_index(self.store.as_ref(), &self.naming)
            .await
            .map_err(PushError::Provisioning)?;

        let normalized = normalize(records, self.naming.index_name().to_string());
        let mut outcomes = pin!(streaming_bulk(
            self.store.as_ref(),
            normalized,
            self.config.chunk_size
        ));
        let mut accumulator = OutcomeAccumulator::new(observer);

        while let Some((ok, item)) = outcomes.try_next().await? {
            accumulator.record(ok, item);
        }

        let summary = accumulator.finish();
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed(),
            "Push completed"
        );
        Ok(summary)
    }

    /// Walk the records as a push would, without touching the store.
    ///
    /// Every record counts as a success and is reported to the observer.
    #[instrument(skip_all, fields(index = %self.naming.index_name()))]
    pub async fn dry_run_push<'a>(
        &self,
        records: RecordStream<'a>,
        observer: Option<&'a mut Observer<'a>>,
    ) -> Result<PushSummary, PushError> {
        let mut normalized = pin!(normalize(records, self.naming.index_name().to_string()));
        let mut accumulator = OutcomeAccumulator::new(observer);

        while let Some(record) = normalized.try_next().await? {
            debug!(record = %record.to_value(), "Would push record");
            accumulator.preview(record);
        }

        let summary = accumulator.finish();
        info!(succeeded = summary.succeeded, "Dry run completed");
        Ok(summary)
    }
}
