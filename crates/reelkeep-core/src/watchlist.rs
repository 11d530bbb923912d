use crate::storage::{KeyValueStore, StoreError, load_json, save_json};
use reelkeep_models::{MovieSummary, WatchlistEntry};
use std::sync::Arc;
use tracing::{debug, info};

pub const WATCHLIST_KEY: &str = "watchlist_v1";

/// The saved-movie collection, kept as one JSON array under one key.
///
/// There is no in-memory cache: every call re-reads the collection and every
/// mutation writes it back in full. Mutating an id that is not present is a
/// silent no-op.
#[derive(Clone)]
pub struct WatchlistStore {
    store: Arc<dyn KeyValueStore>,
}

impl WatchlistStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<WatchlistEntry> {
        load_json(self.store.as_ref(), WATCHLIST_KEY).unwrap_or_default()
    }

    fn write(&self, entries: &[WatchlistEntry]) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), WATCHLIST_KEY, entries)
    }

    /// Apply `f` to the entry with `id`, writing back only when it exists
    fn update<F>(&self, id: i64, f: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut WatchlistEntry),
    {
        let mut entries = self.list();
        match entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                f(entry);
                self.write(&entries)?;
                Ok(true)
            }
            None => {
                debug!("Watchlist update for missing id {} ignored", id);
                Ok(false)
            }
        }
    }

    /// Prepend a new entry. First writer wins: an existing entry is left as is.
    /// Returns whether the movie was added.
    pub fn add(&self, movie: &MovieSummary) -> Result<bool, StoreError> {
        let entries = self.list();
        if entries.iter().any(|e| e.id == movie.id) {
            return Ok(false);
        }

        let entry = WatchlistEntry::from_movie(movie, chrono::Utc::now().timestamp_millis());
        let mut updated = Vec::with_capacity(entries.len() + 1);
        updated.push(entry);
        updated.extend(entries);
        self.write(&updated)?;

        info!("Added {} ({}) to watchlist", movie.title, movie.id);
        Ok(true)
    }

    /// Returns whether anything was removed
    pub fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let entries = self.list();
        let before = entries.len();
        let remaining: Vec<WatchlistEntry> = entries.into_iter().filter(|e| e.id != id).collect();
        if remaining.len() == before {
            return Ok(false);
        }
        self.write(&remaining)?;
        info!("Removed {} from watchlist", id);
        Ok(true)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.list().iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: i64) -> Option<WatchlistEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    pub fn set_watched(&self, id: i64, watched: bool) -> Result<bool, StoreError> {
        self.update(id, |e| e.watched = watched)
    }

    pub fn toggle_watched(&self, id: i64) -> Result<bool, StoreError> {
        self.update(id, |e| e.watched = !e.watched)
    }

    pub fn update_note(&self, id: i64, note: &str) -> Result<bool, StoreError> {
        self.update(id, |e| e.note = note.to_string())
    }

    /// Set or clear the 1-5 rating. Allowed whether or not the entry is watched.
    pub fn update_rating(&self, id: i64, rating: Option<u8>) -> Result<bool, StoreError> {
        self.update(id, |e| e.rating = rating)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(WATCHLIST_KEY)
    }
}
