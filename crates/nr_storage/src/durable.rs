//! Typed, failure-tolerant access to a [`KeyValueStore`].
//!
//! Reads never fail: a missing key, an unreachable backend or a value that
//! no longer parses all yield the caller's default. Writes that fail are
//! logged and dropped, leaving whatever was persisted before.

use nr_core::{KeyValueStore, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct DurableStore {
    backend: Arc<dyn KeyValueStore>,
    changes: broadcast::Sender<String>,
}

impl DurableStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { backend, changes }
    }

    pub async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_read(key).await {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                warn!("Falling back to default for {}: {}", key, e);
                default
            }
        }
    }

    async fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Persist `value` under `key`. Returns `false` when the write was
    /// dropped.
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = match serde_json::to_string(value) {
            Ok(raw) => self.backend.set(key, &raw).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(()) => {
                debug!("Persisted {}", key);
                // Nobody listening is fine.
                let _ = self.changes.send(key.to_string());
                true
            }
            Err(e) => {
                warn!("Failed to persist {}: {}", key, e);
                false
            }
        }
    }

    /// Keys of successful writes made through this store (and its clones),
    /// in write order.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

/// A value loaded once from the store and written back on every change.
///
/// The in-memory value always reflects the latest `set`, even when the
/// write behind it failed.
pub struct Persisted<T> {
    store: DurableStore,
    key: String,
    value: T,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    pub async fn load(store: DurableStore, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = store.read(&key, default).await;
        Self { store, key, value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn set(&mut self, value: T) -> bool {
        self.value = value;
        self.store.write(&self.key, &self.value).await
    }

    /// Mutate in place, then write through.
    pub async fn update<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        change(&mut self.value);
        self.store.write(&self.key, &self.value).await
    }
}
