use crate::location::SEARCH_PATH;
use crate::session::SessionStore;
use crate::storage::StoreError;
use crate::watchlist::WatchlistStore;
use reelkeep_catalog::{Catalog, CatalogError};
use reelkeep_models::{CastMember, MovieDetails, MovieSummary, NavState};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DETAILS_FAILED: &str = "Could not load details.";
pub const TOP_CAST: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailsView {
    pub movie: MovieDetails,
    /// Empty when the crew lists no director
    pub director: String,
    pub cast: Vec<CastMember>,
}

/// Fetch a movie and its credits concurrently. Either failure fails both.
pub async fn load_details(catalog: &dyn Catalog, id: i64) -> Result<MovieDetailsView, CatalogError> {
    let (movie, credits) =
        futures::try_join!(catalog.get_movie(id), catalog.get_movie_credits(id))?;

    let director = credits
        .director()
        .map(|d| d.name.clone())
        .unwrap_or_default();
    let cast = credits.top_cast(TOP_CAST).to_vec();

    Ok(MovieDetailsView {
        movie,
        director,
        cast,
    })
}

/// Identifies one load; only the latest ticket's result is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsTicket {
    generation: u64,
    id: i64,
}

impl DetailsTicket {
    pub fn id(&self) -> i64 {
        self.id
    }
}

pub struct DetailsPage {
    catalog: Arc<dyn Catalog>,
    watchlist: WatchlistStore,
    generation: u64,
    pub target: Option<i64>,
    pub view: Option<MovieDetailsView>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailsPage {
    pub fn new(catalog: Arc<dyn Catalog>, watchlist: WatchlistStore) -> Self {
        Self {
            catalog,
            watchlist,
            generation: 0,
            target: None,
            view: None,
            loading: false,
            error: None,
        }
    }

    /// Point the page at `id`, invalidating any load still running
    pub fn begin(&mut self, id: i64) -> DetailsTicket {
        self.generation += 1;
        self.target = Some(id);
        self.view = None;
        self.loading = true;
        self.error = None;
        DetailsTicket {
            generation: self.generation,
            id,
        }
    }

    /// Store a load result. Returns false when the ticket is stale.
    pub fn finish(&mut self, ticket: DetailsTicket, result: Result<MovieDetailsView, CatalogError>) -> bool {
        if ticket.generation != self.generation || self.target != Some(ticket.id) {
            debug!("Ignoring stale details for {}", ticket.id);
            return false;
        }

        match result {
            Ok(view) => self.view = Some(view),
            Err(e) => {
                warn!("Failed to load details for {}: {}", ticket.id, e);
                self.error = Some(DETAILS_FAILED.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub async fn load(&mut self, id: i64) -> bool {
        let ticket = self.begin(id);
        let result = load_details(self.catalog.as_ref(), id).await;
        self.finish(ticket, result)
    }

    /// Leave the page; results still in flight are discarded
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.target = None;
        self.loading = false;
    }

    pub fn in_watchlist(&self) -> bool {
        self.target.map(|id| self.watchlist.contains(id)).unwrap_or(false)
    }

    /// Add or remove the loaded movie, returning whether it is now on the
    /// watchlist. Does nothing before details have loaded.
    pub fn toggle_watchlist(&self) -> Result<bool, StoreError> {
        let Some(view) = &self.view else {
            return Ok(false);
        };
        if view.movie.id == 0 {
            return Ok(false);
        }

        if self.watchlist.remove(view.movie.id)? {
            return Ok(false);
        }
        self.watchlist.add(&MovieSummary::from(&view.movie))?;
        Ok(true)
    }

    /// Where "back" leads: the search screen, carrying the stored restore
    /// state when the tab has one
    pub fn back_navigation(&self, session: &SessionStore) -> Option<NavState> {
        let restore = session.restore_state()?;
        let from = session
            .last_search_path()
            .unwrap_or_else(|| SEARCH_PATH.to_string());
        Some(NavState { from, restore })
    }
}
