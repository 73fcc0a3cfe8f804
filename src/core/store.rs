//! Storage abstractions

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored value for {key} is not valid UTF-8")]
    Encoding { key: String },
}

/// A durable string key-value store. Writes are best-effort and unordered
/// across keys; callers must tolerate reading one key updated without the
/// other.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
