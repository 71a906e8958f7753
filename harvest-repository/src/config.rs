//! Configuration types for the store client.

use std::env;
use std::time::Duration;

use crate::errors::StoreError;

/// Default OpenSearch URL.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ENDPOINT_VAR: &str = "HARVEST_OPENSEARCH_URL";
const VERIFY_CERTS_VAR: &str = "HARVEST_OPENSEARCH_VERIFY_CERTS";
const TIMEOUT_VAR: &str = "HARVEST_OPENSEARCH_TIMEOUT_SECS";
const DOCUMENT_TYPES_VAR: &str = "HARVEST_OPENSEARCH_DOCUMENT_TYPES";

/// Configuration for the store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL of the store.
    pub endpoint: String,
    /// Whether TLS certificates are verified.
    pub verify_certificates: bool,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Whether bulk action lines carry the record's `_type`.
    /// Only clusters that still support mapping types accept it.
    pub document_types: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            verify_certificates: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            document_types: false,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Enable or disable certificate verification.
    pub fn with_verify_certificates(mut self, verify: bool) -> Self {
        self.verify_certificates = verify;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable `_type` in bulk action lines.
    pub fn with_document_types(mut self, enabled: bool) -> Self {
        self.document_types = enabled;
        self
    }

    /// Build a config from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HARVEST_OPENSEARCH_URL`: store URL (default: http://localhost:9200)
    /// - `HARVEST_OPENSEARCH_VERIFY_CERTS`: verify TLS certificates (default: true)
    /// - `HARVEST_OPENSEARCH_TIMEOUT_SECS`: request timeout in seconds (default: 30)
    /// - `HARVEST_OPENSEARCH_DOCUMENT_TYPES`: send `_type` in bulk actions (default: false)
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        if let Some(raw) = lookup(VERIFY_CERTS_VAR) {
            config.verify_certificates = parse_bool(VERIFY_CERTS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                StoreError::invalid_config(format!(
                    "{} must be a number of seconds, got {:?}",
                    TIMEOUT_VAR, raw
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(DOCUMENT_TYPES_VAR) {
            config.document_types = parse_bool(DOCUMENT_TYPES_VAR, &raw)?;
        }

        Ok(config)
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, StoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StoreError::invalid_config(format!(
            "{} must be a boolean, got {:?}",
            var, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.verify_certificates);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.document_types);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENDPOINT_VAR, "https://search.internal:9200"),
            (VERIFY_CERTS_VAR, "False"),
            (TIMEOUT_VAR, " 5 "),
            (DOCUMENT_TYPES_VAR, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "https://search.internal:9200");
        assert!(!config.verify_certificates);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.document_types);
    }

    #[test]
    fn test_invalid_values() {
        let result = ClientConfig::from_lookup(lookup_from(&[(VERIFY_CERTS_VAR, "maybe")]));
        assert!(matches!(result, Err(StoreError::InvalidConfig(_))));

        let result = ClientConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "30s")]));
        assert!(matches!(result, Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://es:9200")
            .with_verify_certificates(false)
            .with_request_timeout(Duration::from_secs(60))
            .with_document_types(true);

        assert_eq!(config.endpoint, "http://es:9200");
        assert!(!config.verify_certificates);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.document_types);
    }
}
