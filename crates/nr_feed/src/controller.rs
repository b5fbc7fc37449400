use nr_core::{Article, Category, FetchError, NewsSource};
use nr_storage::{DurableStore, Persisted};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::bookmarks::{load_bookmarks, Bookmarks};
use crate::seed::seed_articles;
use crate::view::derive_view;

pub const FETCH_ERROR_MESSAGE: &str = "Failed to load articles. Please try again later.";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub category: Category,
    pub search: String,
}

/// Identifies one fetch cycle. Only the ticket of the most recently started
/// cycle can commit its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: FeedQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }
}

/// Owns the canonical article list and everything derived from it.
///
/// All mutation goes through `&mut self`, so a single owner drives the
/// state machine. Fetches themselves can run elsewhere (see [`run_fetch`])
/// and report back through [`FeedController::complete`].
pub struct FeedController {
    source: Arc<dyn NewsSource>,
    articles: Vec<Article>,
    phase: FeedPhase,
    error: Option<String>,
    query: FeedQuery,
    bookmarks: Persisted<Bookmarks>,
    generation: u64,
    timeout: Duration,
}

impl FeedController {
    pub async fn new(source: Arc<dyn NewsSource>, store: DurableStore) -> Self {
        let bookmarks = load_bookmarks(store).await;
        Self {
            source,
            articles: seed_articles(),
            phase: FeedPhase::Idle,
            error: None,
            query: FeedQuery::default(),
            bookmarks,
            generation: 0,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_query(mut self, category: Category, search: &str) -> Self {
        self.query = FeedQuery {
            category,
            search: search.trim().to_string(),
        };
        self
    }

    pub fn source(&self) -> Arc<dyn NewsSource> {
        self.source.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FeedPhase::Loading
    }

    /// Message for the user when the last cycle failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        self.bookmarks.get()
    }

    pub fn find(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    /// Switch category. Starts a new cycle only if the category changed.
    pub fn select_category(&mut self, category: Category) -> Option<FetchTicket> {
        if self.query.category == category {
            return None;
        }
        self.query.category = category;
        Some(self.begin_fetch())
    }

    /// Apply a settled (debounced) search query. Starts a new cycle only if
    /// the trimmed query changed.
    pub fn set_search(&mut self, search: &str) -> Option<FetchTicket> {
        let search = search.trim();
        if self.query.search == search {
            return None;
        }
        self.query.search = search.to_string();
        Some(self.begin_fetch())
    }

    /// Enter `Loading` for the current query, superseding any cycle in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.phase = FeedPhase::Loading;
        self.error = None;
        debug!(
            "Starting fetch cycle {} (category: {}, search: {:?})",
            self.generation, self.query.category, self.query.search
        );
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Commit the outcome of a cycle. Results for superseded tickets are
    /// dropped and `false` is returned.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<Vec<Article>, FetchError>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale result of cycle {} (latest is {})",
                ticket.generation, self.generation
            );
            return false;
        }

        match result {
            Ok(articles) => {
                info!("✨ Loaded {} articles", articles.len());
                self.articles = articles;
                self.phase = FeedPhase::Loaded;
            }
            Err(e) => {
                warn!("Error fetching articles, showing built-in articles: {}", e);
                self.articles = seed_articles();
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                self.phase = FeedPhase::Failed;
            }
        }
        true
    }

    /// Run a whole cycle for the current query in place.
    pub async fn refresh(&mut self) -> FeedPhase {
        let ticket = self.begin_fetch();
        let result = run_fetch(self.source.clone(), &ticket, self.timeout).await;
        self.complete(&ticket, result);
        self.phase
    }

    /// The filtered, ordered list to render.
    pub fn view(&self) -> Vec<Article> {
        derive_view(&self.articles, self.query.category, self.bookmarks.get())
    }

    /// Returns whether `id` is bookmarked afterwards.
    pub async fn toggle_bookmark(&mut self, id: &str) -> bool {
        let mut bookmarked = false;
        self.bookmarks.update(|bookmarks| bookmarked = bookmarks.toggle(id)).await;
        bookmarked
    }
}

/// Fetch for `ticket`, bounded by `timeout`. Does not touch controller state.
pub async fn run_fetch(
    source: Arc<dyn NewsSource>,
    ticket: &FetchTicket,
    timeout: Duration,
) -> Result<Vec<Article>, FetchError> {
    let query = ticket.query();
    match tokio::time::timeout(timeout, source.fetch(query.category, &query.search)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::{Debouncer, DEFAULT_SEARCH_DELAY};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use nr_storage::{MemoryStore, BOOKMARKS_KEY};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued results and records every request.
    #[derive(Default)]
    struct ScriptedSource {
        results: Mutex<VecDeque<Result<Vec<Article>, FetchError>>>,
        calls: Mutex<Vec<(Category, String)>>,
    }

    impl ScriptedSource {
        fn with_results(results: Vec<Result<Vec<Article>, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                calls: Mutex::default(),
            })
        }

        fn calls(&self) -> Vec<(Category, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NewsSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch(&self, category: Category, query: &str) -> Result<Vec<Article>, FetchError> {
            self.calls.lock().unwrap().push((category, query.to_string()));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Never answers.
    struct HangingSource;

    #[async_trait]
    impl NewsSource for HangingSource {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn fetch(&self, _category: Category, _query: &str) -> Result<Vec<Article>, FetchError> {
            std::future::pending().await
        }
    }

    fn article(id: &str, title: &str, category: Option<Category>, day: u32) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            source_name: "Test".to_string(),
            category,
            url: format!("https://example.com/{}", id),
            image_url: None,
            published_at: Utc.with_ymd_and_hms(2024, 4, day, 8, 0, 0).unwrap(),
        }
    }

    fn store() -> DurableStore {
        DurableStore::new(Arc::new(MemoryStore::new()))
    }

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_starts_idle_with_seed_articles() {
        let controller = FeedController::new(ScriptedSource::with_results(vec![]), store()).await;
        assert_eq!(controller.phase(), FeedPhase::Idle);
        assert_eq!(controller.articles(), seed_articles().as_slice());
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_successful_refresh_replaces_articles() {
        let fetched = vec![article("1", "Fresh", Some(Category::Technology), 2)];
        let source = ScriptedSource::with_results(vec![Ok(fetched.clone())]);
        let mut controller = FeedController::new(source.clone(), store()).await;

        assert_eq!(controller.refresh().await, FeedPhase::Loaded);
        assert_eq!(controller.articles(), fetched.as_slice());
        assert_eq!(controller.error(), None);
        assert_eq!(source.calls(), vec![(Category::All, String::new())]);
    }

    #[tokio::test]
    async fn test_empty_result_is_loaded_not_failed() {
        let source = ScriptedSource::with_results(vec![Ok(Vec::new())]);
        let mut controller = FeedController::new(source, store()).await;

        assert_eq!(controller.refresh().await, FeedPhase::Loaded);
        assert!(controller.articles().is_empty());
        assert!(controller.view().is_empty());
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_seeds_even_after_success() {
        let source = ScriptedSource::with_results(vec![
            Ok(vec![article("1", "Fresh", None, 2)]),
            Err(FetchError::Status { status: 500, reason: "Internal Server Error".to_string() }),
        ]);
        let mut controller = FeedController::new(source, store()).await;
        controller.refresh().await;

        assert_eq!(controller.refresh().await, FeedPhase::Failed);
        assert_eq!(
            titles(controller.articles()),
            vec![
                "The Future of AI in Healthcare",
                "Global Climate Summit Reaches Historic Agreement",
                "Breaking Records at the Olympics",
            ]
        );
        assert!(!controller.error().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_cycle_clears_error() {
        let source = ScriptedSource::with_results(vec![Err(FetchError::Network("refused".to_string()))]);
        let mut controller = FeedController::new(source, store()).await;
        controller.refresh().await;
        assert!(controller.error().is_some());

        let ticket = controller.select_category(Category::Science).unwrap();
        assert_eq!(controller.phase(), FeedPhase::Loading);
        assert_eq!(controller.error(), None);
        assert_eq!(ticket.query().category, Category::Science);
    }

    #[tokio::test]
    async fn test_unchanged_query_starts_no_cycle() {
        let mut controller = FeedController::new(ScriptedSource::with_results(vec![]), store()).await;

        assert!(controller.select_category(Category::All).is_none());
        assert!(controller.set_search("").is_none());
        assert!(controller.set_search("  ").is_none());

        let first = controller.set_search("mars").unwrap();
        assert!(controller.set_search(" mars ").is_none());
        let second = controller.select_category(Category::Science).unwrap();

        assert!(second.generation() > first.generation());
        assert_eq!(second.query().search, "mars");
        assert_eq!(controller.phase(), FeedPhase::Loading);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let mut controller = FeedController::new(ScriptedSource::with_results(vec![]), store()).await;

        let older = controller.select_category(Category::Sports).unwrap();
        let newer = controller.select_category(Category::Health).unwrap();

        let health = vec![article("1", "Health story", Some(Category::Health), 3)];
        assert!(controller.complete(&newer, Ok(health.clone())));

        let sports = vec![article("1", "Sports story", Some(Category::Sports), 4)];
        assert!(!controller.complete(&older, Ok(sports)));
        assert_eq!(controller.articles(), health.as_slice());
        assert_eq!(controller.phase(), FeedPhase::Loaded);

        // A late failure of the superseded cycle must not trigger the fallback.
        assert!(!controller.complete(&older, Err(FetchError::Network("late".to_string()))));
        assert_eq!(controller.error(), None);
    }

    #[tokio::test]
    async fn test_stale_result_arriving_first_keeps_loading() {
        let mut controller = FeedController::new(ScriptedSource::with_results(vec![]), store()).await;

        let older = controller.set_search("old").unwrap();
        let newer = controller.set_search("new").unwrap();

        assert!(!controller.complete(&older, Ok(vec![article("1", "Old", None, 1)])));
        assert!(controller.is_loading());
        assert_eq!(controller.articles(), seed_articles().as_slice());

        assert!(controller.complete(&newer, Ok(vec![article("1", "New", None, 2)])));
        assert_eq!(titles(controller.articles()), vec!["New"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_loading() {
        let mut controller = FeedController::new(Arc::new(HangingSource), store())
            .await
            .with_timeout(Duration::from_secs(3));

        assert_eq!(controller.refresh().await, FeedPhase::Failed);
        assert_eq!(controller.error(), Some(FETCH_ERROR_MESSAGE));
        assert_eq!(controller.articles().len(), 3);
    }

    #[tokio::test]
    async fn test_view_filters_and_puts_bookmarks_first() {
        let source = ScriptedSource::with_results(vec![Ok(vec![
            article("1", "Old tech", Some(Category::Technology), 1),
            article("2", "New tech", Some(Category::Technology), 9),
            article("3", "Sports", Some(Category::Sports), 5),
        ])]);
        let mut controller = FeedController::new(source, store()).await;
        controller.refresh().await;

        assert!(controller.toggle_bookmark("1").await);
        assert_eq!(titles(&controller.view()), vec!["Old tech", "New tech", "Sports"]);

        controller.select_category(Category::Technology);
        assert_eq!(titles(&controller.view()), vec!["Old tech", "New tech"]);
    }

    #[tokio::test]
    async fn test_bookmarks_persist_and_double_toggle_is_noop() {
        let store = store();
        let mut controller = FeedController::new(ScriptedSource::with_results(vec![]), store.clone()).await;

        assert!(controller.toggle_bookmark("2").await);
        let before = controller.bookmarks().clone();

        assert!(controller.toggle_bookmark("3").await);
        assert!(!controller.toggle_bookmark("3").await);
        assert_eq!(controller.bookmarks(), &before);

        let persisted: Vec<String> = store.read(BOOKMARKS_KEY, Vec::new()).await;
        assert_eq!(persisted, vec!["2".to_string()]);

        let reloaded = FeedController::new(ScriptedSource::with_results(vec![]), store.clone()).await;
        assert!(reloaded.bookmarks().contains("2"));
    }

    #[tokio::test]
    async fn test_bookmark_write_failure_keeps_memory_state() {
        let store = DurableStore::new(Arc::new(MemoryStore::with_quota(8)));
        let mut controller = FeedController::new(ScriptedSource::with_results(vec![]), store.clone()).await;

        assert!(controller.toggle_bookmark("1").await);
        assert!(controller.bookmarks().contains("1"));
        assert!(store.read(BOOKMARKS_KEY, Vec::<String>::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_technology_headlines_scenario() {
        let source = ScriptedSource::with_results(vec![Ok(vec![article(
            "1",
            "Chip news",
            Some(Category::Technology),
            1,
        )])]);
        let mut controller = FeedController::new(source.clone(), store()).await;

        let ticket = controller.select_category(Category::Technology).unwrap();
        let result = run_fetch(controller.source(), &ticket, controller.timeout()).await;
        assert!(controller.complete(&ticket, result));

        assert_eq!(source.calls(), vec![(Category::Technology, String::new())]);
        assert!(controller.view().iter().all(|a| a.category == Some(Category::Technology)));
    }

    #[tokio::test]
    async fn test_undecodable_response_falls_back_to_seeds() {
        let source = ScriptedSource::with_results(vec![Err(FetchError::Decode(
            "missing field `articles`".to_string(),
        ))]);
        let mut controller = FeedController::new(source, store()).await;

        assert_eq!(controller.refresh().await, FeedPhase::Failed);
        assert_eq!(controller.articles(), seed_articles().as_slice());
        assert_eq!(controller.error(), Some(FETCH_ERROR_MESSAGE));

        controller.dismiss_error();
        assert_eq!(controller.error(), None);
        assert_eq!(controller.phase(), FeedPhase::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_typing_starts_one_cycle() {
        let source = ScriptedSource::with_results(vec![Ok(vec![article("1", "CLI tools", None, 3)])]);
        let mut controller = FeedController::new(source.clone(), store()).await;
        let (debouncer, mut search) = Debouncer::new(String::new(), DEFAULT_SEARCH_DELAY);
        let start = tokio::time::Instant::now();

        debouncer.push("c".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.push("cl".to_string());
        tokio::time::sleep(Duration::from_millis(30)).await;
        debouncer.push("cli".to_string());

        let mut cycles = 0;
        while tokio::time::timeout(Duration::from_secs(2), search.changed()).await.is_ok() {
            let query = search.borrow_and_update().clone();
            if let Some(ticket) = controller.set_search(&query) {
                assert!(start.elapsed() >= Duration::from_millis(580));
                let result = run_fetch(controller.source(), &ticket, controller.timeout()).await;
                assert!(controller.complete(&ticket, result));
                cycles += 1;
            }
        }

        assert_eq!(cycles, 1);
        assert_eq!(source.calls(), vec![(Category::All, "cli".to_string())]);
        assert_eq!(titles(controller.articles()), vec!["CLI tools"]);
        assert_eq!(controller.phase(), FeedPhase::Loaded);
    }
}
