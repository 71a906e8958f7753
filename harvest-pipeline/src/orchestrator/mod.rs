//! Orchestrator module for the harvest pipeline.
//!
//! Selects collectors from the registry and pushes each of them in turn,
//! all under one capture timestamp.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::classifier::Observer;
use crate::errors::{PushError, RunnerError};
use crate::invocation::CollectorRun;
use crate::registry::CollectorRegistry;
use harvest_repository::IndexStore;
use harvest_shared::{ItemOutcome, PushSummary};

/// Progress is reported this many times over a collector's estimate.
const PROGRESS_STEPS: u64 = 10;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Walk the records without writing anything.
    pub dry_run: bool,
    /// Log progress while a collector is pushed.
    pub progress: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            progress: true,
        }
    }
}

/// Result of pushing one collector.
#[derive(Debug, Clone)]
pub struct CollectorReport {
    /// Qualified name of the collector.
    pub name: String,
    /// Push summary, absent when the push aborted.
    pub summary: Option<PushSummary>,
    /// Why the push aborted.
    pub error: Option<String>,
}

impl CollectorReport {
    /// Records acknowledged as written.
    pub fn pushed(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.succeeded)
    }

    /// Whether the push aborted or left any item failures.
    pub fn failed(&self) -> bool {
        self.error.is_some() || self.summary.as_ref().is_some_and(|s| !s.is_clean())
    }
}

/// Result of a run over a selection of collectors.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Capture timestamp shared by every collector of the run.
    pub timestamp: DateTime<Utc>,
    /// One report per matched collector, in registration order.
    pub collectors: Vec<CollectorReport>,
}

impl RunReport {
    /// Names of the collectors that failed, in run order.
    pub fn failed_collectors(&self) -> Vec<String> {
        self.collectors
            .iter()
            .filter(|c| c.failed())
            .map(|c| c.name.clone())
            .collect()
    }

    /// Turn a run with any failed collector into an error.
    pub fn into_result(self) -> Result<Self, RunnerError> {
        let failed = self.failed_collectors();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(RunnerError::CollectorsFailed(failed))
        }
    }
}

/// Logs how far a collector has got.
///
/// With an estimate it reports on every tenth of it, otherwise once per
/// bulk chunk.
pub(crate) struct ProgressTracker {
    collector: String,
    estimate: Option<u64>,
    chunk_size: u64,
    step: u64,
    processed: u64,
}

impl ProgressTracker {
    pub(crate) fn new(collector: &str, estimate: Option<u64>, chunk_size: usize) -> Self {
        Self {
            collector: collector.to_string(),
            estimate: estimate.filter(|total| *total > 0),
            chunk_size: (chunk_size as u64).max(1),
            step: 1,
            processed: 0,
        }
    }

    /// Record count at which the given step is reached.
    fn threshold(&self, step: u64) -> u64 {
        match self.estimate {
            Some(total) => (step * total).div_ceil(PROGRESS_STEPS),
            None => step * self.chunk_size,
        }
    }

    /// Count one processed record. Returns whether progress was logged.
    pub(crate) fn observe(&mut self) -> bool {
        self.processed += 1;
        if self.processed < self.threshold(self.step) {
            return false;
        }
        while self.threshold(self.step) <= self.processed {
            self.step += 1;
        }

        match self.estimate {
            Some(total) => info!(
                collector = %self.collector,
                processed = self.processed,
                estimated = total,
                percent = self.processed * 100 / total,
                "Push progress"
            ),
            None => info!(
                collector = %self.collector,
                processed = self.processed,
                "Push progress"
            ),
        }
        true
    }
}

/// Runs selections of registered collectors against one store.
pub struct Orchestrator {
    registry: CollectorRegistry,
    store: Arc<dyn IndexStore>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(registry: CollectorRegistry, store: Arc<dyn IndexStore>) -> Self {
        Self::with_config(registry, store, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        registry: CollectorRegistry,
        store: Arc<dyn IndexStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }

    /// Qualified names of every registered collector.
    pub fn list(&self) -> Vec<String> {
        self.registry
            .list()
            .iter()
            .map(|e| e.qualified_name().to_string())
            .collect()
    }

    /// Qualified names of the collectors `selectors` match, in the order
    /// they will be pushed.
    pub fn matched<S: AsRef<str>>(&self, selectors: &[S]) -> Result<Vec<String>, RunnerError> {
        let matched: Vec<_> = self
            .registry
            .select(selectors)
            .iter()
            .map(|e| e.qualified_name().to_string())
            .collect();
        if matched.is_empty() {
            return Err(RunnerError::NoCollectorsMatched);
        }
        Ok(matched)
    }

    /// Push every collector matched by `selectors`, captured now.
    pub async fn run<S: AsRef<str>>(&self, selectors: &[S]) -> Result<RunReport, RunnerError> {
        self.run_at_with(selectors, Utc::now(), |_| {}).await
    }

    /// Like [`Orchestrator::run`], calling `on_report` as each collector finishes.
    pub async fn run_with<S, F>(
        &self,
        selectors: &[S],
        on_report: F,
    ) -> Result<RunReport, RunnerError>
    where
        S: AsRef<str>,
        F: FnMut(&CollectorReport),
    {
        self.run_at_with(selectors, Utc::now(), on_report).await
    }

    /// Push every collector matched by `selectors` under `timestamp`.
    pub async fn run_at<S: AsRef<str>>(
        &self,
        selectors: &[S],
        timestamp: DateTime<Utc>,
    ) -> Result<RunReport, RunnerError> {
        self.run_at_with(selectors, timestamp, |_| {}).await
    }

    /// Push every collector matched by `selectors` under `timestamp`,
    /// calling `on_report` as each collector finishes.
    ///
    /// A collector that aborts is logged and reported; the remaining
    /// collectors still run.
    #[instrument(skip_all, fields(dry_run = self.config.dry_run))]
    pub async fn run_at_with<S, F>(
        &self,
        selectors: &[S],
        timestamp: DateTime<Utc>,
        mut on_report: F,
    ) -> Result<RunReport, RunnerError>
    where
        S: AsRef<str>,
        F: FnMut(&CollectorReport),
    {
        let matched = self.registry.select(selectors);
        if matched.is_empty() {
            return Err(RunnerError::NoCollectorsMatched);
        }
        info!(count = matched.len(), "Matched collectors");

        let mut collectors = Vec::with_capacity(matched.len());
        for entry in matched {
            let run = CollectorRun::new(
                entry.qualified_name(),
                entry.instantiate(),
                self.store.clone(),
                Some(timestamp),
            );

            let report = match self.push(&run).await {
                Ok(summary) => {
                    if !summary.is_clean() {
                        warn!(
                            collector = %run.name(),
                            failed = summary.failed(),
                            "Collector finished with failures"
                        );
                    }
                    CollectorReport {
                        name: run.name().to_string(),
                        summary: Some(summary),
                        error: None,
                    }
                }
                Err(e) => {
                    error!(collector = %run.name(), error = %e, "Collector push aborted");
                    CollectorReport {
                        name: run.name().to_string(),
                        summary: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            info!(collector = %report.name, pushed = report.pushed(), "Collector done");
            on_report(&report);
            collectors.push(report);
        }

        Ok(RunReport {
            timestamp,
            collectors,
        })
    }

    async fn push(&self, run: &CollectorRun) -> Result<PushSummary, PushError> {
        if !self.config.progress {
            return if self.config.dry_run {
                run.dry_run_push(None).await
            } else {
                run.push(None).await
            };
        }

        let mut tracker = ProgressTracker::new(run.name(), run.estimated_count(), run.chunk_size());
        let mut count = |_: bool, _: &ItemOutcome| {
            tracker.observe();
        };
        let observer: &mut Observer<'_> = &mut count;

        if self.config.dry_run {
            run.dry_run_push(Some(observer)).await
        } else {
            run.push(Some(observer)).await
        }
    }
}
