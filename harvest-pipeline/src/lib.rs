//! # Harvest Pipeline
//!
//! This crate turns the records produced by collectors into bulk writes
//! against the index store.
//!
//! ## Architecture
//!
//! A push follows the Provision-Normalize-Load pattern:
//!
//! 1. **Naming**: Resolves the destination index and its `latest` alias
//! 2. **Provisioner**: Creates the index and repoints the alias
//! 3. **Normalizer**: Stamps each record with its index and document type
//! 4. **Loader**: Batches records into bulk requests and streams back outcomes
//! 5. **Classifier**: Decides which outcomes count as failures and tallies them
//! 6. **Orchestrator**: Selects registered collectors and pushes each of them

pub mod classifier;
pub mod collector;
pub mod errors;
pub mod invocation;
pub mod loader;
pub mod naming;
pub mod normalizer;
pub mod orchestrator;
pub mod provisioner;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::{Collector, CollectorSettings, DatePattern, RecordStream};
pub use errors::{CollectorError, PushError, RunnerError};
pub use invocation::CollectorRun;
pub use orchestrator::{CollectorReport, Orchestrator, OrchestratorConfig, RunReport};
pub use registry::{list_collectors, register_collector, CollectorEntry, CollectorRegistry};
