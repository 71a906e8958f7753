//! Dependency initialization and wiring for the harness.

use std::sync::Arc;
use tracing::info;

use crate::HarvestError;
use harvest_repository::{ClientConfig, OpenSearchStore};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured store client.
    pub store: Arc<OpenSearchStore>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HARVEST_OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `HARVEST_OPENSEARCH_VERIFY_CERTS`: verify TLS certificates (default: true)
    /// - `HARVEST_OPENSEARCH_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `HARVEST_OPENSEARCH_DOCUMENT_TYPES`: send `_type` in bulk requests (default: false)
    ///
    /// `endpoint` takes precedence over `HARVEST_OPENSEARCH_URL`.
    pub fn new(endpoint: Option<&str>) -> Result<Self, HarvestError> {
        let config = ClientConfig::from_env()?;
        Self::with_config(resolve_endpoint(config, endpoint))
    }

    /// Initialize all dependencies from an explicit client configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, HarvestError> {
        info!(
            opensearch_url = %config.endpoint,
            verify_certificates = config.verify_certificates,
            "Initializing dependencies"
        );

        let store = OpenSearchStore::new(config).map_err(|e| {
            HarvestError::config(format!("Failed to create OpenSearch client: {}", e))
        })?;

        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Verify the store is reachable and healthy.
    pub async fn verify(&self) -> Result<(), HarvestError> {
        let healthy = self
            .store
            .health_check()
            .await
            .map_err(|e| HarvestError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(HarvestError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");
        Ok(())
    }
}

fn resolve_endpoint(config: ClientConfig, endpoint: Option<&str>) -> ClientConfig {
    match endpoint {
        Some(endpoint) => ClientConfig {
            endpoint: endpoint.to_string(),
            ..config
        },
        None => config,
    }
}
