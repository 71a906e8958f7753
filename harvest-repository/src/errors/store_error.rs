//! Store error types.
//!
//! This module defines the errors that can occur while talking to the index store.

use thiserror::Error;

/// Errors that can occur during index store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Failed to reach the store, or the request timed out.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The index to create already exists.
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    /// The index or alias addressed by the request does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store rejected the request.
    #[error("Request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Failed to parse the store's response.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index already exists error.
    pub fn index_already_exists(index: impl Into<String>) -> Self {
        Self::IndexAlreadyExists(index.into())
    }

    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create an API error from a status code and response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
