pub mod bookmarks;
pub mod controller;
pub mod debounce;
pub mod prefs;
pub mod seed;
pub mod share;
pub mod view;

pub use bookmarks::{load_bookmarks, Bookmarks};
pub use controller::{run_fetch, FeedController, FeedPhase, FeedQuery, FetchTicket, FETCH_ERROR_MESSAGE};
pub use debounce::{Debouncer, DEFAULT_SEARCH_DELAY};
pub use prefs::Preferences;
pub use seed::seed_articles;
pub use share::ShareLinks;
pub use view::derive_view;

pub mod prelude {
    pub use super::{Bookmarks, Debouncer, FeedController, FeedPhase, Preferences, ShareLinks};
    pub use nr_core::{Article, Category, Error, Result};
}
