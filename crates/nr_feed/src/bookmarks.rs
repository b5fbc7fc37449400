use nr_storage::{DurableStore, Persisted, BOOKMARKS_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Load the bookmark set kept under [`BOOKMARKS_KEY`], empty if absent.
pub async fn load_bookmarks(store: DurableStore) -> Persisted<Bookmarks> {
    Persisted::load(store, BOOKMARKS_KEY, Bookmarks::default()).await
}

/// Bookmarked article ids. Persisted as a JSON array in insertion order;
/// membership checks go through a hash set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Bookmarks {
    order: Vec<String>,
    index: HashSet<String>,
}

impl Bookmarks {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut bookmarks = Self::default();
        for id in ids {
            bookmarks.insert(id.into());
        }
        bookmarks
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Returns `false` if `id` was already bookmarked.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if !self.index.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Returns `false` if `id` was not bookmarked.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.order.retain(|existing| existing != id);
        true
    }

    /// Flip membership of `id`. Returns whether it is bookmarked afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id)
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl From<Vec<String>> for Bookmarks {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<Bookmarks> for Vec<String> {
    fn from(bookmarks: Bookmarks) -> Self {
        bookmarks.order
    }
}
