pub mod disk;
pub mod memory;

use crate::core::store::KeyValueStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

const PARTITION: &str = "widget";

/// Opens the persistent store under `{data_path}/cache`, or an in-memory
/// store if that directory cannot be opened.
pub fn open_store(data_path: &Path) -> Arc<dyn KeyValueStore> {
    let cache_dir = data_path.join("cache");
    match DiskStore::open(&cache_dir, PARTITION) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, path = %cache_dir.display(), "Falling back to in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}
