//! Index store trait definition.

use async_trait::async_trait;

use crate::errors::StoreError;
use harvest_shared::{BulkItemResponse, Record};

/// Abstract interface for the remote store collectors write into.
///
/// Implementations report conditions the caller may want to tolerate as
/// distinct errors (`IndexAlreadyExists`, `NotFound`) instead of swallowing
/// them, so the decision stays with the caller.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Create an index.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(StoreError::IndexAlreadyExists)` - If the index already exists
    /// * `Err(StoreError)` - If the request fails for any other reason
    async fn create_index(&self, index: &str) -> Result<(), StoreError>;

    /// Remove an alias from every index it is bound to.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the alias was removed
    /// * `Err(StoreError::NotFound)` - If no index carries the alias
    /// * `Err(StoreError)` - If the request fails for any other reason
    async fn delete_alias(&self, alias: &str) -> Result<(), StoreError>;

    /// Bind an alias to an index.
    async fn put_alias(&self, index: &str, alias: &str) -> Result<(), StoreError>;

    /// Submit a batch of records as one bulk request.
    ///
    /// Item-level failures are reported in-band: the returned vector holds one
    /// acknowledgement per record, in request order, whatever its status.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BulkItemResponse>)` - One acknowledgement per record
    /// * `Err(StoreError)` - If the request as a whole could not be completed
    async fn bulk(&self, records: &[Record]) -> Result<Vec<BulkItemResponse>, StoreError>;
}
