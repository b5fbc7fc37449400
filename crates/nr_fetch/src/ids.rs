use sha2::{Digest, Sha256};
use std::fmt;

use nr_core::types::MISSING_URL;

/// How article ids are assigned to a fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IdStrategy {
    /// `1`, `2`, ... in response order. Only unique within one batch.
    #[default]
    Sequential,
    /// First 16 hex digits of the SHA-256 of the article URL, stable across
    /// fetches. Articles without a URL fall back to their position.
    UrlHash,
}

impl IdStrategy {
    /// Id for the article at zero-based `index` whose normalized URL is `url`.
    pub fn assign(&self, index: usize, url: &str) -> String {
        match self {
            IdStrategy::Sequential => (index + 1).to_string(),
            IdStrategy::UrlHash if url == MISSING_URL => (index + 1).to_string(),
            IdStrategy::UrlHash => url_hash(url),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Sequential => f.write_str("sequential"),
            IdStrategy::UrlHash => f.write_str("url-hash"),
        }
    }
}

fn url_hash(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest.iter().take(8).map(|b| format!("{:02x}", b)).collect()
}
