use crate::core::store::{KeyValueStore, StorageError};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

impl From<fjall::Error> for StorageError {
    fn from(e: fjall::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// Persistent store backed by a single fjall partition
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path, partition: &str) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path).map_err(|e| StorageError::Backend(e.to_string()))?;

        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition(partition, PartitionCreateOptions::default())?;
        debug!(path = %path.display(), "Opened disk store");
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(bytes) = self.partition.get(key)? else {
            debug!(key, "Store MISS");
            return Ok(None);
        };
        debug!(key, "Store HIT");
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|_| StorageError::Encoding {
                key: key.to_string(),
            })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.partition.insert(key, value)?;
        // Sync the journal on every write
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(key, "Store SET");
        Ok(())
    }
}
