//! Debounced, cancel-on-supersede search for one search box.
//!
//! Each box moves through `Idle -> Pending -> InFlight -> {Idle, Error}`.
//! Starting a new search cancels the pending timer and drops any in-flight
//! request, so a superseded query never delivers results. An aborted
//! request reports `CatalogError::Canceled` instead; a canceled timer
//! reports nothing.

use reelkeep_catalog::{Catalog, CatalogError};
use reelkeep_models::{MovieSummary, PersonSummary, SearchMode};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    InFlight,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Movies(Vec<MovieSummary>),
    People(Vec<PersonSummary>),
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub generation: u64,
    pub mode: SearchMode,
    pub query: String,
    /// Restoration searches do not touch the recent-searches history
    pub silent: bool,
    pub result: Result<SearchResults, CatalogError>,
}

struct Shared {
    generation: u64,
    phase: Phase,
}

pub struct SearchController {
    catalog: Arc<dyn Catalog>,
    debounce: Duration,
    max_results: usize,
    shared: Arc<Mutex<Shared>>,
    current: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

impl SearchController {
    pub fn new(catalog: Arc<dyn Catalog>, debounce: Duration, max_results: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            debounce,
            max_results: max_results.max(1),
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                phase: Phase::Idle,
            })),
            current: None,
            tx,
            rx,
        }
    }

    pub fn phase(&self) -> Phase {
        lock(&self.shared).phase.clone()
    }

    pub fn generation(&self) -> u64 {
        lock(&self.shared).generation
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::InFlight
    }

    /// A timer is pending or a request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.phase(), Phase::Pending | Phase::InFlight)
    }

    /// Debounced search, as issued on every keystroke
    pub fn schedule(&mut self, mode: SearchMode, query: &str) {
        self.start(mode, query, self.debounce, false);
    }

    /// Immediate search (Enter, a recent-search pick, or state restoration)
    pub fn search_now(&mut self, mode: SearchMode, query: &str, silent: bool) {
        self.start(mode, query, Duration::ZERO, silent);
    }

    /// Drop any pending or in-flight search and return to idle
    pub fn cancel(&mut self) {
        self.supersede();
        lock(&self.shared).phase = Phase::Idle;
    }

    fn supersede(&mut self) -> u64 {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.generation
    }

    fn start(&mut self, mode: SearchMode, query: &str, delay: Duration, silent: bool) {
        let generation = self.supersede();
        let text = query.trim().to_string();

        if text.is_empty() {
            lock(&self.shared).phase = Phase::Idle;
            return;
        }

        lock(&self.shared).phase = if delay.is_zero() { Phase::InFlight } else { Phase::Pending };

        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let catalog = self.catalog.clone();
        let shared = self.shared.clone();
        let tx = self.tx.clone();
        let max_results = self.max_results;

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                let mut guard = lock(&shared);
                if guard.generation != generation {
                    return;
                }
                guard.phase = Phase::InFlight;
            }

            debug!(mode = %mode, query = %text, "Search request");

            // Dropping the request future aborts the HTTP call
            let result = tokio::select! {
                _ = token.cancelled() => {
                    debug!(query = %text, "Search superseded");
                    let _ = tx.send(SearchOutcome {
                        generation,
                        mode,
                        query: text.clone(),
                        silent,
                        result: Err(CatalogError::Canceled),
                    });
                    return;
                }
                result = run_search(catalog.as_ref(), mode, &text, max_results) => result,
            };

            let mut guard = lock(&shared);
            if guard.generation != generation {
                return;
            }
            guard.phase = match &result {
                Ok(_) => Phase::Idle,
                Err(e) => {
                    warn!(query = %text, "Search failed: {}", e);
                    Phase::Error(e.to_string())
                }
            };
            let _ = tx.send(SearchOutcome {
                generation,
                mode,
                query: text,
                silent,
                result,
            });
        });
    }

    pub async fn next_outcome(&mut self) -> Option<SearchOutcome> {
        self.rx.recv().await
    }

    pub fn try_next_outcome(&mut self) -> Option<SearchOutcome> {
        self.rx.try_recv().ok()
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

async fn run_search(
    catalog: &dyn Catalog,
    mode: SearchMode,
    query: &str,
    max_results: usize,
) -> Result<SearchResults, CatalogError> {
    match mode {
        SearchMode::Movie => {
            let mut page = catalog.search_movies(query, 1).await?;
            page.results.truncate(max_results);
            Ok(SearchResults::Movies(page.results))
        }
        SearchMode::Person => {
            let mut page = catalog.search_people(query, 1).await?;
            page.results.truncate(max_results);
            Ok(SearchResults::People(page.results))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;

    fn controller(catalog: Arc<FakeCatalog>) -> SearchController {
        SearchController::new(catalog, DEFAULT_DEBOUNCE, 24)
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_issues_only_latest_query() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut search = controller(catalog.clone());

        search.schedule(SearchMode::Movie, "Mat");
        assert_eq!(search.phase(), Phase::Pending);
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.schedule(SearchMode::Movie, "Matrix");

        let outcome = search.next_outcome().await.unwrap();
        assert_eq!(outcome.query, "Matrix");
        assert!(!outcome.silent);
        assert_eq!(catalog.calls(), vec!["search_movies:Matrix"]);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(search.try_next_outcome().is_none());
        assert_eq!(search.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_request_before_debounce_window() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut search = controller(catalog.clone());

        search.schedule(SearchMode::Movie, "Heat");
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(catalog.calls().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        let outcome = search.next_outcome().await.unwrap();
        assert_eq!(outcome.query, "Heat");
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_request_is_canceled_by_newer_one() {
        let catalog = Arc::new(FakeCatalog::with_delay(Duration::from_secs(1)));
        let mut search = controller(catalog.clone());

        search.search_now(SearchMode::Movie, "Mat", false);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(search.phase(), Phase::InFlight);

        search.search_now(SearchMode::Movie, "Matrix", false);
        let canceled = search.next_outcome().await.unwrap();
        assert_eq!(canceled.query, "Mat");
        assert!(matches!(canceled.result, Err(CatalogError::Canceled)));
        assert_eq!(search.phase(), Phase::InFlight);

        let outcome = search.next_outcome().await.unwrap();
        assert_eq!(outcome.query, "Matrix");
        assert!(outcome.result.is_ok());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(search.try_next_outcome().is_none());
        assert_eq!(catalog.calls(), vec!["search_movies:Mat", "search_movies:Matrix"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_are_truncated() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut search = controller(catalog);

        search.search_now(SearchMode::Movie, "dune", true);
        let outcome = search.next_outcome().await.unwrap();
        assert!(outcome.silent);
        match outcome.result.unwrap() {
            SearchResults::Movies(movies) => assert_eq!(movies.len(), 24),
            other => panic!("unexpected results: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_person_mode_queries_people() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut search = controller(catalog.clone());

        search.search_now(SearchMode::Person, " Nolan ", false);
        let outcome = search.next_outcome().await.unwrap();
        assert_eq!(outcome.mode, SearchMode::Person);
        assert!(matches!(outcome.result, Ok(SearchResults::People(_))));
        assert_eq!(catalog.calls(), vec!["search_people:Nolan"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_moves_to_error() {
        let catalog = Arc::new(FakeCatalog::new());
        catalog.fail("search_movies");
        let mut search = controller(catalog);

        search.search_now(SearchMode::Movie, "x", false);
        let outcome = search.next_outcome().await.unwrap();
        assert!(outcome.result.is_err());
        assert!(matches!(search.phase(), Phase::Error(_)));
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_cancels_and_idles() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut search = controller(catalog.clone());

        search.schedule(SearchMode::Movie, "Alien");
        search.schedule(SearchMode::Movie, "   ");
        assert_eq!(search.phase(), Phase::Idle);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(search.try_next_outcome().is_none());
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_reports_canceled_instead_of_results() {
        let catalog = Arc::new(FakeCatalog::with_delay(Duration::from_millis(300)));
        let mut search = controller(catalog);

        search.search_now(SearchMode::Movie, "Alien", false);
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        let outcome = search.try_next_outcome().unwrap();
        assert!(outcome.result.as_ref().is_err_and(|e| e.is_canceled()));
        assert!(outcome.generation < search.generation());
        assert!(search.try_next_outcome().is_none());
        assert_eq!(search.phase(), Phase::Idle);
    }
}
