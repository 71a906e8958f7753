//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `IndexStore`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cert::CertificateValidation,
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteAliasParts, IndicesPutAliasParts},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::StoreError;
use crate::interfaces::IndexStore;
use crate::opensearch::bulk;
use harvest_shared::{BulkItemResponse, Record};

/// Index pattern that addresses every index when removing an alias.
const ALL_INDICES: &str = "_all";

/// OpenSearch store implementation.
///
/// # Example
///
/// ```ignore
/// use harvest_repository::{ClientConfig, IndexStore, OpenSearchStore};
///
/// let store = OpenSearchStore::new(ClientConfig::new("http://localhost:9200"))?;
/// store.create_index("metrics-2024-01").await?;
/// ```
pub struct OpenSearchStore {
    client: OpenSearch,
    config: ClientConfig,
}

impl OpenSearchStore {
    /// Create a new store client from the given configuration.
    ///
    /// No request is sent; the connection is established lazily.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchStore)` - A new client instance
    /// * `Err(StoreError)` - If the endpoint is invalid or the transport cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, StoreError> {
        let parsed_url = Url::parse(&config.endpoint).map_err(|e| {
            StoreError::invalid_config(format!("Invalid endpoint {}: {}", config.endpoint, e))
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.request_timeout);
        if !config.verify_certificates {
            warn!(endpoint = %config.endpoint, "Certificate verification disabled");
            builder = builder.cert_validation(CertificateValidation::None);
        }
        let transport = builder
            .build()
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            endpoint = %config.endpoint,
            timeout_secs = config.request_timeout.as_secs(),
            "Created OpenSearch client"
        );

        Ok(Self { client, config })
    }

    /// Configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check if the cluster is reachable and not in `red` state.
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;
        let status = body.get("status").and_then(Value::as_str).unwrap_or("red");

        debug!(status = %status, "Cluster health");
        Ok(status != "red")
    }

    /// Turn a non-success response into the matching error.
    async fn failure(response: Response, subject: &str) -> StoreError {
        let status = response.status_code().as_u16();
        let body = response.text().await.unwrap_or_default();
        classify_failure(status, body, subject)
    }
}

/// Map a failed response onto the error taxonomy callers match on.
fn classify_failure(status: u16, body: String, subject: &str) -> StoreError {
    match status {
        404 => StoreError::not_found(subject),
        400 if body.contains("resource_already_exists_exception") => {
            StoreError::index_already_exists(subject)
        }
        _ => StoreError::api(status, body),
    }
}

#[async_trait]
impl IndexStore for OpenSearchStore {
    #[instrument(skip(self))]
    async fn create_index(&self, index: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, index).await);
        }

        info!(index = %index, "Index created");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_alias(&self, alias: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .delete_alias(IndicesDeleteAliasParts::IndexName(&[ALL_INDICES], &[alias]))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, alias).await);
        }

        debug!(alias = %alias, "Alias removed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn put_alias(&self, index: &str, alias: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .indices()
            .put_alias(IndicesPutAliasParts::IndexName(&[index], alias))
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, index).await);
        }

        info!(index = %index, alias = %alias, "Alias bound");
        Ok(())
    }

    #[instrument(skip(self, records), fields(record_count = records.len()))]
    async fn bulk(&self, records: &[Record]) -> Result<Vec<BulkItemResponse>, StoreError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let body: Vec<JsonBody<Value>> = bulk::encode(records, self.config.document_types)
            .into_iter()
            .map(Into::into)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(StoreError::api(status.as_u16(), error_body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| StoreError::parse(e.to_string()))?;

        let items = bulk::decode(payload, records.len())?;
        debug!(count = items.len(), "Bulk request acknowledged");
        Ok(items)
    }
}
