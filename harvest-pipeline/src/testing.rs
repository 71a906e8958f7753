//! In-memory index store shared by the pipeline tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use harvest_repository::{IndexStore, StoreError};
use harvest_shared::{BulkItemResponse, OpType, Record};

type Responder = Box<dyn Fn(&Record) -> BulkItemResponse + Send + Sync>;

/// Store calls in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateIndex(String),
    DeleteAlias(String),
    PutAlias { index: String, alias: String },
    Bulk(usize),
}

/// Mock store that keeps indices and aliases in memory and acknowledges
/// bulk items through a configurable responder.
pub(crate) struct MockStore {
    calls: Mutex<Vec<Call>>,
    indices: Mutex<HashSet<String>>,
    aliases: Mutex<HashMap<String, String>>,
    batches: Mutex<Vec<Vec<Record>>>,
    responder: Responder,
    create_error: Option<StoreError>,
    fail_bulk_at: Option<usize>,
}

fn accept_all(record: &Record) -> BulkItemResponse {
    let status = match record.op {
        OpType::Index | OpType::Create => 201,
        OpType::Update | OpType::Delete => 200,
    };
    let item = BulkItemResponse::new(record.op, status);
    match record.index {
        Some(ref index) => item.with_index(index.clone()),
        None => item,
    }
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            indices: Mutex::new(HashSet::new()),
            aliases: Mutex::new(HashMap::new()),
            batches: Mutex::new(Vec::new()),
            responder: Box::new(accept_all),
            create_error: None,
            fail_bulk_at: None,
        }
    }

    /// Acknowledge bulk items with `responder` instead of accepting them all.
    pub(crate) fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&Record) -> BulkItemResponse + Send + Sync + 'static,
    {
        self.responder = Box::new(responder);
        self
    }

    /// Start with an index already present.
    pub(crate) fn with_index(self, index: &str) -> Self {
        self.indices.try_lock().unwrap().insert(index.to_string());
        self
    }

    /// Start with an alias bound to an index.
    pub(crate) fn with_alias(self, alias: &str, index: &str) -> Self {
        self.aliases
            .try_lock()
            .unwrap()
            .insert(alias.to_string(), index.to_string());
        self
    }

    /// Fail every create-index request with `error`.
    pub(crate) fn with_create_error(mut self, error: StoreError) -> Self {
        self.create_error = Some(error);
        self
    }

    /// Fail the bulk request with the given zero-based position.
    pub(crate) fn failing_bulk_at(mut self, batch: usize) -> Self {
        self.fail_bulk_at = Some(batch);
        self
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().await.iter().map(Vec::len).collect()
    }

    pub(crate) async fn written(&self) -> Vec<Record> {
        self.batches.lock().await.iter().flatten().cloned().collect()
    }

    pub(crate) async fn alias_target(&self, alias: &str) -> Option<String> {
        self.aliases.lock().await.get(alias).cloned()
    }

    pub(crate) async fn has_index(&self, index: &str) -> bool {
        self.indices.lock().await.contains(index)
    }
}

#[async_trait]
impl IndexStore for MockStore {
    async fn create_index(&self, index: &str) -> Result<(), StoreError> {
        self.calls
            .lock()
            .await
            .push(Call::CreateIndex(index.to_string()));
        if let Some(ref error) = self.create_error {
            return Err(error.clone());
        }
        if !self.indices.lock().await.insert(index.to_string()) {
            return Err(StoreError::index_already_exists(index));
        }
        Ok(())
    }

    async fn delete_alias(&self, alias: &str) -> Result<(), StoreError> {
        self.calls
            .lock()
            .await
            .push(Call::DeleteAlias(alias.to_string()));
        match self.aliases.lock().await.remove(alias) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(alias)),
        }
    }

    async fn put_alias(&self, index: &str, alias: &str) -> Result<(), StoreError> {
        self.calls.lock().await.push(Call::PutAlias {
            index: index.to_string(),
            alias: alias.to_string(),
        });
        if !self.indices.lock().await.contains(index) {
            return Err(StoreError::not_found(index));
        }
        self.aliases
            .lock()
            .await
            .insert(alias.to_string(), index.to_string());
        Ok(())
    }

    async fn bulk(&self, records: &[Record]) -> Result<Vec<BulkItemResponse>, StoreError> {
        self.calls.lock().await.push(Call::Bulk(records.len()));
        let mut batches = self.batches.lock().await;
        if self.fail_bulk_at == Some(batches.len()) {
            return Err(StoreError::connection("connection reset by peer"));
        }
        batches.push(records.to_vec());
        Ok(records.iter().map(|r| (self.responder)(r)).collect())
    }
}
