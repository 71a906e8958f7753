//! Error types for the harvest repository.

mod store_error;

pub use store_error::StoreError;
