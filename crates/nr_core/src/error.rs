use std::time::Duration;
use thiserror::Error;

/// Failure of a single call to the external news API.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("News API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failure of the durable key-value store. Never shown to the user.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Database error: {0}")]
    Database(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("No article with id {0}")]
    ArticleNotFound(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
