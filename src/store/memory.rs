use crate::core::store::{KeyValueStore, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store, used for tests and runs without a data directory
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let store = self.inner.lock().await;
        let value = store.get(key).cloned();
        debug!(key, found = value.is_some(), "Store GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut store = self.inner.lock().await;
        debug!(key, "Store SET");
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
