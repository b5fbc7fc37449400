use async_trait::async_trait;
use nr_core::{KeyValueStore, Result, StorageError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use crate::StorageBackend;

type Entries = BTreeMap<String, String>;

/// All keys in a single JSON object on disk. The file is read on first
/// access and rewritten whole on every change.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<Option<Entries>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> std::result::Result<Entries, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Entries::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, entries: &Entries) -> std::result::Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `change` to a copy of the entries and only adopt it once the
    /// file has been written.
    async fn modify<F>(&self, change: F) -> std::result::Result<(), StorageError>
    where
        F: FnOnce(&mut Entries),
    {
        let mut cache = self.cache.lock().await;
        let mut entries = match cache.as_ref() {
            Some(entries) => entries.clone(),
            None => self.load().await?,
        };
        change(&mut entries);
        self.persist(&entries).await?;
        *cache = Some(entries);
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for JsonFileStore {
    fn get_error_message() -> &'static str {
        "JSON store file should be readable and writable"
    }

    async fn open(path: &Path) -> Result<Self> {
        let store = Self::new(path);
        // Surface an unreadable file early; a corrupt one is left for the
        // typed layer to fall back on.
        if let Err(StorageError::Io(e)) = store.load().await {
            return Err(StorageError::Io(e).into());
        }
        Ok(store)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await?);
        }
        Ok(cache.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        self.modify(|entries| {
            entries.remove(key);
        })
        .await
    }
}
