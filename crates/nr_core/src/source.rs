use async_trait::async_trait;
use crate::error::FetchError;
use crate::types::{Article, Category};

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Human readable name of the backing API
    fn name(&self) -> &str;

    /// Fetch one batch of articles for `category`, narrowed by `query` when
    /// it is non-empty
    async fn fetch(&self, category: Category, query: &str) -> Result<Vec<Article>, FetchError>;
}
