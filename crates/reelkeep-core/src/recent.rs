use crate::storage::{KeyValueStore, StoreError, load_json, save_json};
use std::sync::Arc;

pub const RECENT_KEY: &str = "recentSearches";
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Most-recent-first search history, persisted across sessions
#[derive(Clone)]
pub struct RecentSearches {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limit(store, DEFAULT_RECENT_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self { store, limit: limit.max(1) }
    }

    pub fn list(&self) -> Vec<String> {
        let mut list: Vec<String> = load_json(self.store.as_ref(), RECENT_KEY).unwrap_or_default();
        list.truncate(self.limit);
        list
    }

    /// Move `query` to the front, returning the new list. Blank queries are ignored.
    pub fn record(&self, query: &str) -> Result<Vec<String>, StoreError> {
        let text = query.trim();
        if text.is_empty() {
            return Ok(self.list());
        }
        let next = push_recent(&self.list(), text, self.limit);
        save_json(self.store.as_ref(), RECENT_KEY, &next)?;
        Ok(next)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(RECENT_KEY)
    }
}

pub fn push_recent(list: &[String], query: &str, limit: usize) -> Vec<String> {
    std::iter::once(query.to_string())
        .chain(list.iter().filter(|q| q.as_str() != query).cloned())
        .take(limit)
        .collect()
}
