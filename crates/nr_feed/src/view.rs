use nr_core::{Article, Category};
use std::cmp::Reverse;

use crate::bookmarks::Bookmarks;

/// The render-ready list: articles in `category`, bookmarked ones first,
/// newest first within each group. Equal keys keep their input order.
pub fn derive_view(articles: &[Article], category: Category, bookmarks: &Bookmarks) -> Vec<Article> {
    let mut view: Vec<Article> = articles
        .iter()
        .filter(|article| category.matches(article.category))
        .cloned()
        .collect();
    // sort_by_key is stable
    view.sort_by_key(|article| (!bookmarks.contains(&article.id), Reverse(article.published_at)));
    view
}
