pub mod memory;
pub mod json;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
pub use json::JsonFileStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
