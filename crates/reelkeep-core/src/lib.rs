pub mod storage;
pub mod watchlist;
pub mod recent;
pub mod session;
pub mod location;
pub mod restore;
pub mod search;
pub mod pages;

#[cfg(test)]
pub(crate) mod testing;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError, load_json, save_json};
pub use watchlist::WatchlistStore;
pub use recent::RecentSearches;
pub use session::SessionStore;
pub use location::Location;
pub use restore::{resolve_initial_state, url_restore};
pub use search::{Phase, SearchController, SearchOutcome, SearchResults};
pub use pages::{DetailsPage, HomePage, MovieDetailsView, SearchPage, WatchlistPage};
