use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nr_core::types::{MISSING_URL, NO_DESCRIPTION, UNKNOWN_SOURCE, UNTITLED};
use nr_core::{Article, Category, FetchError, NewsSource};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error, info};
use url::Url;

use super::utils;
use crate::{ClientConfig, IdStrategy};

const SEARCH_ENDPOINT: &str = "search";
const HEADLINES_ENDPOINT: &str = "top-headlines";

/// An error payload (`{"errors": [...]}`) has no `articles` and fails to
/// decode, even when it arrives with a 200.
#[derive(Debug, Deserialize)]
struct RawResponse {
    articles: Vec<RawArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    source: Option<RawSource>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    name: Option<String>,
}

/// Client for the GNews v4 API.
pub struct GNewsClient {
    client: Client,
    config: ClientConfig,
}

impl GNewsClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The full request URL for one fetch cycle.
    pub fn request_url(&self, category: Category, query: &str) -> Result<Url, FetchError> {
        build_request_url(&self.config, category, query)
    }

    fn network_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else {
            FetchError::Network(e.to_string())
        }
    }

    async fn fetch_inner(&self, category: Category, query: &str) -> Result<Vec<Article>, FetchError> {
        let url = self.request_url(category, query)?;
        debug!("Requesting {} (category: {}, query: {:?})", url.path(), category, query.trim());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.network_error(e))?;
        let raw: RawResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(normalize(
            raw.articles,
            category,
            self.config.id_strategy,
            Utc::now(),
        ))
    }
}

impl fmt::Debug for GNewsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GNewsClient")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl NewsSource for GNewsClient {
    fn name(&self) -> &str {
        "GNews"
    }

    async fn fetch(&self, category: Category, query: &str) -> Result<Vec<Article>, FetchError> {
        match self.fetch_inner(category, query).await {
            Ok(articles) => {
                info!("📰 Fetched {} articles from {} ({})", articles.len(), self.name(), category);
                Ok(articles)
            }
            Err(e) => {
                error!("Error fetching news: {}", e);
                Err(e)
            }
        }
    }
}

/// Pick the endpoint and assemble query parameters. Search is used whenever
/// the query has content; the category is only sent when it restricts.
pub fn build_request_url(config: &ClientConfig, category: Category, query: &str) -> Result<Url, FetchError> {
    let query = query.trim();
    let endpoint = if query.is_empty() { HEADLINES_ENDPOINT } else { SEARCH_ENDPOINT };

    let base = format!("{}/{}", config.base_url.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;

    {
        let mut params = url.query_pairs_mut();
        params
            .append_pair("apikey", &config.api_key)
            .append_pair("lang", &config.lang)
            .append_pair("country", &config.country)
            .append_pair("max", &config.max.to_string());
        if !query.is_empty() {
            params.append_pair("q", query);
        }
        if !category.is_all() {
            params.append_pair("category", category.as_str());
        }
    }

    Ok(url)
}

/// Map raw payload items to articles in response order. The category comes
/// from the request, whatever the payload says.
pub(crate) fn normalize(
    raw: Vec<RawArticle>,
    category: Category,
    id_strategy: IdStrategy,
    now: DateTime<Utc>,
) -> Vec<Article> {
    raw.into_iter()
        .enumerate()
        .map(|(index, item)| {
            let url = utils::text_or(item.url, MISSING_URL);
            Article {
                id: id_strategy.assign(index, &url),
                title: utils::text_or(item.title, UNTITLED),
                description: utils::text_or(item.description, NO_DESCRIPTION),
                source_name: utils::text_or(item.source.and_then(|s| s.name), UNKNOWN_SOURCE),
                category: category.as_article_category(),
                url,
                image_url: utils::non_empty(item.image),
                published_at: utils::published_at_or(item.published_at, now),
            }
        })
        .collect()
}
