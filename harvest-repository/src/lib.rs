//! # Harvest Repository
//!
//! This crate provides the interface the harvest pipeline writes through,
//! the errors a store can report, and a concrete implementation for
//! OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use config::ClientConfig;
pub use errors::StoreError;
pub use interfaces::IndexStore;
pub use opensearch::OpenSearchStore;
