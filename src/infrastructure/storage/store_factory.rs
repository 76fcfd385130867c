use std::sync::Arc;

use crate::application::ports::{KeyValueStore, StorageError};
use crate::presentation::config::StorageSettings;

use super::json_file_store::JsonFileStore;
use super::memory_store::MemoryStore;

pub struct KeyValueStoreFactory;

impl KeyValueStoreFactory {
    /// File-backed when a path is configured, otherwise in memory.
    pub async fn create(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn KeyValueStore>, StorageError> {
        match settings.path.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(path) => Ok(Arc::new(JsonFileStore::open(path).await?)),
            None => {
                tracing::warn!("No storage path configured, state will not survive restarts");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}
