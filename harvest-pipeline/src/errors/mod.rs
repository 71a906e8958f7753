//! Error types for the harvest pipeline.

use harvest_repository::StoreError;
use thiserror::Error;

/// Errors raised by collectors and their configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectorError {
    /// The collector failed while producing a record.
    #[error("Collection error: {0}")]
    CollectionError(String),

    /// The collector is misconfigured.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CollectorError {
    /// Create a collection error.
    pub fn collection(msg: impl Into<String>) -> Self {
        Self::CollectionError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Errors that abort a push.
///
/// Item-level store failures are not errors: they are reported in the
/// push summary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PushError {
    /// Creating the index or repointing its alias failed. Nothing was written.
    #[error("Provisioning error: {0}")]
    Provisioning(#[source] StoreError),

    /// A bulk request could not be completed.
    #[error("Transport error: {0}")]
    Transport(#[source] StoreError),

    /// The collector failed while producing records.
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),
}

/// Errors from running a selection of collectors.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// No registered collector matched the selectors.
    #[error("no valid collectors specified")]
    NoCollectorsMatched,

    /// Some collectors reported failures or aborted.
    #[error("These collectors failed: {}", .0.join(", "))]
    CollectorsFailed(Vec<String>),
}
