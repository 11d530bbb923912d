use crate::location::{Location, SEARCH_PATH};
use crate::recent::RecentSearches;
use crate::restore::resolve_initial_state;
use crate::search::{SearchController, SearchOutcome, SearchResults};
use crate::session::SessionStore;
use reelkeep_catalog::Catalog;
use reelkeep_models::{
    MovieSummary, NavState, PersonMovieCredits, PersonSummary, SearchMode, SearchRestoreState,
};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
pub const PERSON_MOVIES_FAILED: &str = "Could not load person movies.";
pub const DEFAULT_PERSON_CREDITS_LIMIT: usize = 30;

/// Credits with an id, most popular first, at most `limit`
pub fn top_person_movies(credits: PersonMovieCredits, limit: usize) -> Vec<MovieSummary> {
    let mut movies: Vec<MovieSummary> = credits.cast.iter().filter_map(|c| c.to_summary()).collect();
    movies.sort_by(|a, b| {
        let pa = a.popularity.unwrap_or(0.0);
        let pb = b.popularity.unwrap_or(0.0);
        pb.partial_cmp(&pa).unwrap_or(Ordering::Equal)
    });
    movies.truncate(limit);
    movies
}

/// The search screen.
///
/// Keeps the query, mode and selected person mirrored into the location,
/// the tab-scoped restore state and the last search path, so leaving for a
/// details screen and coming back lands on the same results.
pub struct SearchPage {
    catalog: Arc<dyn Catalog>,
    controller: SearchController,
    recent_store: RecentSearches,
    session: SessionStore,
    person_credits_limit: usize,
    restored: bool,

    pub location: Location,
    pub mode: SearchMode,
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub people: Vec<PersonSummary>,
    pub selected_person: Option<PersonSummary>,
    pub person_movies: Vec<MovieSummary>,
    pub person_loading: bool,
    pub error: Option<String>,
    pub recent: Vec<String>,
}

impl SearchPage {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        recent_store: RecentSearches,
        session: SessionStore,
        debounce: Duration,
        max_results: usize,
        person_credits_limit: usize,
    ) -> Self {
        let controller = SearchController::new(catalog.clone(), debounce, max_results);
        let recent = recent_store.list();
        Self {
            catalog,
            controller,
            recent_store,
            session,
            person_credits_limit: person_credits_limit.max(1),
            restored: false,
            location: Location::new(SEARCH_PATH),
            mode: SearchMode::Movie,
            query: String::new(),
            movies: Vec::new(),
            people: Vec::new(),
            selected_person: None,
            person_movies: Vec::new(),
            person_loading: false,
            error: None,
            recent,
        }
    }

    /// Restore the initial state once, then mirror it out.
    ///
    /// Restoration searches are silent. In person mode a resolved person is
    /// reopened as if clicked.
    pub async fn mount(&mut self, nav: Option<&NavState>, location: Location) {
        if self.restored {
            return;
        }
        self.restored = true;
        self.location = location;

        let stored = self.session.restore_state();
        let state = resolve_initial_state(nav, &self.location, stored).unwrap_or_default();
        debug!(mode = %state.mode, query = %state.q, "Restoring search state");

        self.mode = state.mode;
        self.query = state.q.clone();
        self.sync();

        if !state.has_query() {
            return;
        }
        self.controller.search_now(self.mode, &self.query, true);

        if self.mode == SearchMode::Person {
            if let Some(person_id) = state.selected_person_id {
                self.restore_person(person_id).await;
            }
        }
    }

    /// A keystroke-level query change
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        if !self.restored {
            return;
        }
        self.sync();
        self.error = None;
        self.controller.schedule(self.mode, &self.query);
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.error = None;
        self.movies.clear();
        self.people.clear();
        self.selected_person = None;
        self.person_movies.clear();
        self.controller.cancel();

        if !self.restored {
            return;
        }
        self.sync();
        self.controller.schedule(self.mode, &self.query);
    }

    /// Search immediately, as on Enter
    pub fn submit(&mut self) {
        self.error = None;
        self.controller.search_now(self.mode, &self.query, false);
    }

    pub fn pick_recent(&mut self, query: &str) {
        self.query = query.to_string();
        self.sync();
        self.submit();
    }

    pub async fn open_person(&mut self, person: PersonSummary) {
        info!("Opening person {} ({})", person.name, person.id);
        let person_id = person.id;
        self.selected_person = Some(person);
        self.person_movies.clear();
        self.person_loading = true;
        self.error = None;
        self.save_restore_state();

        match self.catalog.get_person_movie_credits(person_id).await {
            Ok(credits) => {
                self.person_movies = top_person_movies(credits, self.person_credits_limit);
            }
            Err(e) => {
                warn!("Failed to load movies for person {}: {}", person_id, e);
                self.error = Some(PERSON_MOVIES_FAILED.to_string());
            }
        }

        self.person_loading = false;
    }

    /// Failures are ignored; the plain search results remain
    async fn restore_person(&mut self, person_id: i64) {
        match self.catalog.get_person(person_id).await {
            Ok(details) if details.id != 0 => self.open_person(PersonSummary::from(&details)).await,
            Ok(_) => {}
            Err(e) => debug!("Could not restore person {}: {}", person_id, e),
        }
    }

    pub fn close_person(&mut self) {
        self.selected_person = None;
        self.person_movies.clear();
        self.save_restore_state();
    }

    /// Reset the screen and wipe recent searches plus all tab-scoped state
    pub fn clear(&mut self) {
        self.controller.cancel();
        self.query.clear();
        self.movies.clear();
        self.people.clear();
        self.selected_person = None;
        self.person_movies.clear();
        self.error = None;
        self.recent.clear();

        if let Err(e) = self.recent_store.clear() {
            warn!("Failed to clear recent searches: {}", e);
        }
        if let Err(e) = self.session.clear() {
            warn!("Failed to clear search session: {}", e);
        }
        self.location = Location::new(SEARCH_PATH);
    }

    /// Fold a finished search into the page. Canceled and superseded
    /// searches are dropped. Returns whether the outcome was applied.
    ///
    /// The error is cleared when a search starts, never here, so a failed
    /// person load stays visible next to fresh results.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.result.as_ref().is_err_and(|e| e.is_canceled()) {
            debug!(query = %outcome.query, "Ignoring canceled search");
            return false;
        }
        if outcome.generation != self.controller.generation() || outcome.mode != self.mode {
            debug!(query = %outcome.query, "Dropping stale search outcome");
            return false;
        }

        match outcome.result {
            Ok(SearchResults::Movies(movies)) => {
                self.movies = movies;
                self.people.clear();
            }
            Ok(SearchResults::People(people)) => {
                self.people = people;
                self.movies.clear();
            }
            Err(e) => {
                self.error = Some(if e.is_configuration_missing() {
                    e.to_string()
                } else {
                    SEARCH_FAILED.to_string()
                });
                return true;
            }
        }

        if !outcome.silent {
            match self.recent_store.record(&outcome.query) {
                Ok(list) => self.recent = list,
                Err(e) => warn!("Failed to record recent search: {}", e),
            }
        }
        true
    }

    pub async fn next_outcome(&mut self) -> Option<SearchOutcome> {
        self.controller.next_outcome().await
    }

    /// Wait until no search is pending or in flight, applying outcomes
    pub async fn settle(&mut self) {
        while self.controller.is_busy() {
            match self.controller.next_outcome().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
        while let Some(outcome) = self.controller.try_next_outcome() {
            self.apply(outcome);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading() || self.person_loading
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy() || self.person_loading
    }

    pub fn restore_state(&self) -> SearchRestoreState {
        SearchRestoreState::new(self.mode, self.query.clone())
            .with_person(self.selected_person.as_ref().map(|p| p.id))
    }

    /// Navigation state carried by a link to a details screen
    pub fn nav_state(&self) -> NavState {
        NavState {
            from: self.location.to_string(),
            restore: self.restore_state(),
        }
    }

    fn sync(&mut self) {
        let current_mode = self.location.get("mode").unwrap_or("");
        let current_q = self.location.get("q").unwrap_or("");
        if current_mode != self.mode.as_str() || current_q != self.query {
            self.location = Location::search(self.mode, &self.query);
        }

        if let Err(e) = self.session.save_last_search_path(&self.location.to_string()) {
            warn!("Failed to save last search path: {}", e);
        }
        self.save_restore_state();
    }

    fn save_restore_state(&self) {
        if let Err(e) = self.session.save_restore_state(&self.restore_state()) {
            warn!("Failed to save search restore state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::DEFAULT_DEBOUNCE;
    use crate::storage::MemoryStore;
    use crate::testing::{FakeCatalog, person};
    use reelkeep_catalog::CatalogError;
    use reelkeep_models::PersonCredit;

    struct Fixture {
        catalog: Arc<FakeCatalog>,
        recent: RecentSearches,
        session: SessionStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: Arc::new(FakeCatalog::new()),
                recent: RecentSearches::new(Arc::new(MemoryStore::new())),
                session: SessionStore::new(Arc::new(MemoryStore::new())),
            }
        }

        fn page(&self) -> SearchPage {
            SearchPage::new(
                self.catalog.clone(),
                self.recent.clone(),
                self.session.clone(),
                DEFAULT_DEBOUNCE,
                24,
                DEFAULT_PERSON_CREDITS_LIMIT,
            )
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_restores_person_search_from_location() {
        let fx = Fixture::new();
        fx.recent.record("alien").unwrap();
        let mut page = fx.page();

        page.mount(None, Location::parse("/search?mode=person&q=Nolan")).await;
        page.settle().await;

        assert_eq!(page.mode, SearchMode::Person);
        assert_eq!(page.query, "Nolan");
        assert_eq!(page.people.len(), 1);
        assert!(page.movies.is_empty());
        assert_eq!(fx.catalog.calls(), vec!["search_people:Nolan"]);
        assert_eq!(fx.recent.list(), vec!["alien"]);
        assert_eq!(page.recent, vec!["alien"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_reopens_selected_person() {
        let fx = Fixture::new();
        let nav = NavState {
            from: "/search?mode=person&q=Nolan".to_string(),
            restore: SearchRestoreState::new(SearchMode::Person, "Nolan").with_person(Some(525)),
        };
        let mut page = fx.page();

        page.mount(Some(&nav), Location::new(SEARCH_PATH)).await;
        page.settle().await;

        assert_eq!(page.selected_person.as_ref().map(|p| p.id), Some(525));
        let titles: Vec<&str> = page.person_movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["High", "Mid", "Low"]);
        assert_eq!(fx.session.restore_state().unwrap().selected_person_id, Some(525));
        assert_eq!(page.location.to_string(), "/search?mode=person&q=Nolan");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_prefers_stored_state_over_nothing() {
        let fx = Fixture::new();
        fx.session
            .save_restore_state(&SearchRestoreState::new(SearchMode::Movie, "heat"))
            .unwrap();
        let mut page = fx.page();

        page.mount(None, Location::new(SEARCH_PATH)).await;
        page.settle().await;

        assert_eq!(page.query, "heat");
        assert_eq!(page.movies.len(), 24);
        assert_eq!(fx.session.last_search_path().as_deref(), Some("/search?mode=movie&q=heat"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_runs_only_once() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::parse("?q=heat")).await;
        page.settle().await;
        page.mount(None, Location::parse("?q=alien")).await;
        page.settle().await;

        assert_eq!(page.query, "heat");
        assert_eq!(fx.catalog.calls(), vec!["search_movies:heat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_is_debounced_and_recorded() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;

        page.set_query("Mat");
        tokio::time::sleep(Duration::from_millis(100)).await;
        page.set_query("Matrix");
        page.settle().await;

        assert_eq!(fx.catalog.calls(), vec!["search_movies:Matrix"]);
        assert_eq!(page.movies[0].title, "Matrix 1");
        assert_eq!(page.recent, vec!["Matrix"]);
        assert_eq!(page.location.to_string(), "/search?mode=movie&q=Matrix");
        assert_eq!(
            fx.session.restore_state(),
            Some(SearchRestoreState::new(SearchMode::Movie, "Matrix"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_and_pick_recent_search_once() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;

        page.pick_recent("dune");
        page.settle().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        page.settle().await;

        assert_eq!(fx.catalog.calls(), vec!["search_movies:dune"]);
        assert_eq!(page.recent, vec!["dune"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_change_clears_results() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::parse("?q=nolan")).await;
        page.settle().await;
        assert!(!page.movies.is_empty());

        page.set_mode(SearchMode::Person);
        assert!(page.movies.is_empty());
        assert!(page.people.is_empty());
        assert_eq!(page.error, None);

        page.settle().await;
        assert_eq!(page.people.len(), 1);
        assert_eq!(page.location.get("mode"), Some("person"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_failure_message() {
        let fx = Fixture::new();
        fx.catalog.fail("search_movies");
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;

        page.set_query("alien");
        page.submit();
        page.settle().await;

        assert_eq!(page.error.as_deref(), Some(SEARCH_FAILED));
        assert!(!page.is_loading());
        assert!(page.recent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_person_movies_failure_message() {
        let fx = Fixture::new();
        fx.catalog.fail("get_person_movie_credits");
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;

        page.open_person(person(7, "Someone")).await;
        assert_eq!(page.error.as_deref(), Some(PERSON_MOVIES_FAILED));
        assert!(!page.person_loading);
        assert!(page.person_movies.is_empty());

        page.close_person();
        assert_eq!(page.selected_person, None);
        assert_eq!(fx.session.restore_state().unwrap().selected_person_id, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_person_movies_failure_survives_restored_search() {
        let fx = Fixture::new();
        fx.catalog.fail("get_person_movie_credits");
        let nav = NavState {
            from: "/search?mode=person&q=Nolan".to_string(),
            restore: SearchRestoreState::new(SearchMode::Person, "Nolan").with_person(Some(525)),
        };
        let mut page = fx.page();

        page.mount(Some(&nav), Location::new(SEARCH_PATH)).await;
        assert_eq!(page.error.as_deref(), Some(PERSON_MOVIES_FAILED));
        page.settle().await;

        assert_eq!(page.error.as_deref(), Some(PERSON_MOVIES_FAILED));
        assert_eq!(page.people.len(), 1);
        assert_eq!(page.selected_person.as_ref().map(|p| p.id), Some(525));
        assert!(page.person_movies.is_empty());

        // A new search starts clean
        page.set_query("Nolan C");
        assert_eq!(page.error, None);
        page.settle().await;
        assert_eq!(page.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_key_shows_its_own_message() {
        let fx = Fixture::new();
        fx.catalog.fail_without_key("search_movies");
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;

        page.set_query("alien");
        page.submit();
        page.settle().await;

        let expected = CatalogError::ConfigurationMissing.to_string();
        assert_eq!(page.error.as_deref(), Some(expected.as_str()));
        assert_ne!(page.error.as_deref(), Some(SEARCH_FAILED));
        assert!(page.recent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_canceled_outcome_leaves_page_untouched() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::parse("?q=heat")).await;
        page.settle().await;
        page.error = Some(PERSON_MOVIES_FAILED.to_string());

        let applied = page.apply(SearchOutcome {
            generation: page.controller.generation(),
            mode: SearchMode::Movie,
            query: "heat".to_string(),
            silent: false,
            result: Err(CatalogError::Canceled),
        });

        assert!(!applied);
        assert_eq!(page.error.as_deref(), Some(PERSON_MOVIES_FAILED));
        assert_eq!(page.movies.len(), 24);
        assert!(page.recent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_in_flight_search_is_swallowed() {
        let fx = Fixture {
            catalog: Arc::new(FakeCatalog::with_delay(Duration::from_secs(1))),
            ..Fixture::new()
        };
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;

        page.set_query("Mat");
        page.submit();
        tokio::time::sleep(Duration::from_millis(200)).await;
        page.set_query("Matrix");
        page.submit();
        page.settle().await;

        assert_eq!(page.error, None);
        assert_eq!(page.movies[0].title, "Matrix 1");
        assert_eq!(page.recent, vec!["Matrix"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_wipes_everything() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::new(SEARCH_PATH)).await;
        page.set_query("alien");
        page.submit();
        page.settle().await;
        assert_eq!(fx.recent.list(), vec!["alien"]);

        page.clear();

        assert_eq!(page.query, "");
        assert!(page.movies.is_empty());
        assert!(page.recent.is_empty());
        assert!(fx.recent.list().is_empty());
        assert_eq!(fx.session.restore_state(), None);
        assert_eq!(fx.session.last_search_path(), None);
        assert_eq!(page.location.to_string(), "/search");
    }

    #[tokio::test(start_paused = true)]
    async fn test_nav_state_carries_restore() {
        let fx = Fixture::new();
        let mut page = fx.page();
        page.mount(None, Location::parse("/search?mode=person&q=Nolan")).await;
        page.settle().await;
        page.open_person(person(525, "Christopher Nolan")).await;

        let nav = page.nav_state();
        assert_eq!(nav.from, "/search?mode=person&q=Nolan");
        assert_eq!(nav.restore.selected_person_id, Some(525));
        assert_eq!(nav.restore.mode, SearchMode::Person);
    }

    #[test]
    fn test_top_person_movies() {
        let credit = |id: Option<i64>, popularity: Option<f64>| PersonCredit {
            id,
            title: format!("{:?}", id),
            character: None,
            release_date: None,
            poster_path: None,
            overview: None,
            vote_average: None,
            popularity,
        };
        let mut cast: Vec<PersonCredit> = (1..=40).map(|i| credit(Some(i), Some(i as f64))).collect();
        cast.push(credit(None, Some(1000.0)));
        cast.push(credit(Some(0), Some(1000.0)));
        cast.push(credit(Some(99), None));

        let movies = top_person_movies(PersonMovieCredits { cast }, 30);
        assert_eq!(movies.len(), 30);
        assert_eq!(movies[0].id, 40);
        assert_eq!(movies[29].id, 11);
    }
}
