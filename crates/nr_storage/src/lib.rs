use async_trait::async_trait;
use nr_core::{KeyValueStore, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub mod backends;
pub mod durable;

pub use backends::*;
pub use durable::{DurableStore, Persisted};

/// Storage key holding the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Storage key holding the bookmarked article ids.
pub const BOOKMARKS_KEY: &str = "bookmarks";

pub const DEFAULT_STORE_PATH: &str = "newsreel.json";

#[async_trait]
pub trait StorageBackend: KeyValueStore {
    fn get_error_message() -> &'static str;
    async fn open(path: &Path) -> Result<Self> where Self: Sized;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreKind {
    Memory,
    #[default]
    Json,
    Sqlite,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreKind::Memory => "memory",
            StoreKind::Json => "json",
            StoreKind::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}

async fn open_backend<T: StorageBackend + 'static>(path: &Path) -> Result<Arc<dyn KeyValueStore>> {
    match T::open(path).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) => {
            tracing::error!("{} ({})", T::get_error_message(), e);
            Err(e)
        }
    }
}

/// Open the backend named by `kind`. `path` is ignored by the memory backend.
pub async fn create_store(kind: StoreKind, path: &Path) -> Result<Arc<dyn KeyValueStore>> {
    match kind {
        StoreKind::Memory => open_backend::<MemoryStore>(path).await,
        StoreKind::Json => open_backend::<JsonFileStore>(path).await,
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => open_backend::<SqliteStore>(path).await,
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => Err(nr_core::StorageError::Database(
            "SQLite support not compiled in, rebuild with the `sqlite` feature".to_string(),
        )
        .into()),
    }
}

pub mod prelude {
    pub use super::{create_store, DurableStore, Persisted, StorageBackend, StoreKind};
    pub use super::backends::*;
}
