use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

pub const UNTITLED: &str = "Untitled";
pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const MISSING_URL: &str = "#";

/// A news item ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_name: String,
    /// Category the article was requested under. `None` when fetched without
    /// a category restriction.
    pub category: Option<Category>,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Category {
    /// Every category in display order, starting with the `All` sentinel.
    pub const ALL_CATEGORIES: [Category; 9] = [
        Category::All,
        Category::World,
        Category::Nation,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
        Category::Sports,
        Category::Science,
        Category::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::World => "world",
            Category::Nation => "nation",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
            Category::Science => "science",
            Category::Health => "health",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Category::All)
    }

    /// The value to stamp on articles fetched under this category.
    pub fn as_article_category(&self) -> Option<Category> {
        (!self.is_all()).then_some(*self)
    }

    /// Whether an article tagged `category` passes this filter.
    pub fn matches(&self, category: Option<Category>) -> bool {
        self.is_all() || category == Some(*self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL_CATEGORIES
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::InvalidCategory(s.to_string()))
    }
}
