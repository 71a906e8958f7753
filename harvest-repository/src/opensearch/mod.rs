//! OpenSearch implementation of the index store.
//!
//! This module provides a concrete implementation of `IndexStore`
//! using OpenSearch as the backend.

mod bulk;
mod client;

pub use client::OpenSearchStore;
