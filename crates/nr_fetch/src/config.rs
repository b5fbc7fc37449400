use std::fmt;
use std::time::Duration;

use crate::IdStrategy;

pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_MAX_ARTICLES: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub lang: String,
    pub country: String,
    pub max: u32,
    pub id_strategy: IdStrategy,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            max: DEFAULT_MAX_ARTICLES,
            id_strategy: IdStrategy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("lang", &self.lang)
            .field("country", &self.country)
            .field("max", &self.max)
            .field("id_strategy", &self.id_strategy)
            .field("timeout", &self.timeout)
            .finish()
    }
}
