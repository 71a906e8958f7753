//! Per-collector index and batching settings.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

use crate::errors::CollectorError;

/// Default number of records per bulk request.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default suffix of the alias pointing at the most recent bucket.
pub const DEFAULT_ALIAS_SUFFIX: &str = "-latest";

/// A validated strftime pattern used to bucket indices by time.
///
/// Validation happens on construction, so formatting never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern(String);

impl DatePattern {
    /// Parse a strftime pattern such as `%Y-%m-%d`.
    pub fn new(pattern: impl Into<String>) -> Result<Self, CollectorError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(CollectorError::config("date pattern must not be empty"));
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(CollectorError::config(format!(
                "invalid date pattern: {}",
                pattern
            )));
        }
        Ok(Self(pattern))
    }

    /// The pattern as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format a timestamp with this pattern.
    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp.format(&self.0).to_string()
    }
}

/// Index and batching settings of a collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Explicit base index name. Defaults to the lowercased qualified name.
    pub index_name: Option<String>,
    /// Pattern bucketing the index by capture time. `None` disables bucketing.
    pub index_date_pattern: Option<DatePattern>,
    /// Maximum number of records per bulk request.
    pub chunk_size: usize,
    /// Suffix of the alias tracking the latest bucket. `None` disables the alias.
    pub alias_suffix: Option<String>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            index_name: None,
            index_date_pattern: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            alias_suffix: Some(DEFAULT_ALIAS_SUFFIX.to_string()),
        }
    }
}

impl CollectorSettings {
    /// Set an explicit base index name.
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Bucket the index by the given date pattern.
    pub fn with_date_pattern(mut self, pattern: DatePattern) -> Self {
        self.index_date_pattern = Some(pattern);
        self
    }

    /// Set the bulk chunk size. Values below 1 are raised to 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the alias suffix, or disable the alias with `None`.
    pub fn with_alias_suffix(mut self, suffix: Option<String>) -> Self {
        self.alias_suffix = suffix;
        self
    }
}
