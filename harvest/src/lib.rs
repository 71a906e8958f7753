//! # Harvest
//!
//! Main library for the harvest collector harness.
//!
//! This crate wires the store client from the environment, initializes
//! logging, and exposes the command-line surface. A host program registers
//! its collectors, then hands the registry to [`cli::run`].

pub mod cli;
pub mod collectors;
pub mod config;
pub mod logging;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur while running the harness.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Store error.
    #[error("Store error: {0}")]
    StoreError(#[from] harvest_repository::StoreError),

    /// Runner error.
    #[error(transparent)]
    RunnerError(#[from] harvest_pipeline::RunnerError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl HarvestError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
