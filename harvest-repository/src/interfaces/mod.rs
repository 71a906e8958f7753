//! Interface definitions for the index store.
//!
//! This module defines the abstract `IndexStore` trait so the pipeline can be
//! wired to OpenSearch in production and to in-memory stores in tests.

mod index_store;

pub use index_store::IndexStore;
