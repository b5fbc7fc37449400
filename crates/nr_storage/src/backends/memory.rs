use async_trait::async_trait;
use nr_core::{KeyValueStore, Result, StorageError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

/// Process-local store. Contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total size of keys and values past
    /// `bytes`, the way browser local storage does.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Arc::default(),
            quota: Some(bytes),
        }
    }

    fn used_bytes(entries: &HashMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

#[async_trait]
impl StorageBackend for MemoryStore {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn open(_path: &Path) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if let Some(quota) = self.quota {
            let previous = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let needed = Self::used_bytes(&entries) - previous + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}
