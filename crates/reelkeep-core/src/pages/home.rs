use crate::storage::StoreError;
use crate::watchlist::WatchlistStore;
use reelkeep_catalog::Catalog;
use reelkeep_models::MovieSummary;
use std::sync::Arc;
use tracing::warn;

/// Popular movies listing
pub struct HomePage {
    catalog: Arc<dyn Catalog>,
    watchlist: WatchlistStore,
    pub movies: Vec<MovieSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

impl HomePage {
    pub fn new(catalog: Arc<dyn Catalog>, watchlist: WatchlistStore) -> Self {
        Self {
            catalog,
            watchlist,
            movies: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub async fn load(&mut self, page: u32) {
        self.loading = true;
        self.error = None;

        match self.catalog.list_popular(page.max(1)).await {
            Ok(paged) => self.movies = paged.results,
            Err(e) => {
                warn!("Failed to load popular movies: {}", e);
                self.error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    pub fn in_watchlist(&self, id: i64) -> bool {
        self.watchlist.contains(id)
    }

    /// Add or remove `movie`, returning whether it is now on the watchlist
    pub fn toggle_watchlist(&self, movie: &MovieSummary) -> Result<bool, StoreError> {
        if self.watchlist.remove(movie.id)? {
            return Ok(false);
        }
        self.watchlist.add(movie)?;
        Ok(true)
    }
}
