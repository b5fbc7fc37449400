use async_trait::async_trait;
use nr_core::{KeyValueStore, Result, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use std::path::Path;
use std::sync::Arc;
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

fn db_error(context: &str, e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(format!("{}: {}", context, e))
}

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
}

#[async_trait]
impl StorageBackend for SqliteStore {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at the configured store path"
    }

    async fn open(path: &Path) -> Result<Self> {
        Ok(Self::new_with_path(path).await?)
    }
}

impl SqliteStore {
    pub async fn new_with_path(db_path: &Path) -> std::result::Result<Self, StorageError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to run migration {}", i), e))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to read key", e))?;
        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        sqlx::query("INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to write key", e))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to delete key", e))?;
        Ok(())
    }
}
