use crate::storage::{KeyValueStore, StoreError, load_json, save_json};
use reelkeep_models::SearchRestoreState;
use std::sync::Arc;

pub const RESTORE_KEY: &str = "searchRestore";
pub const LAST_PATH_KEY: &str = "lastSearchPath";

/// Tab-scoped state of the search page: the last search box snapshot and
/// the last full path+query visited
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn restore_state(&self) -> Option<SearchRestoreState> {
        load_json(self.store.as_ref(), RESTORE_KEY)
    }

    pub fn save_restore_state(&self, state: &SearchRestoreState) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), RESTORE_KEY, state)
    }

    /// Stored as a plain string, not JSON
    pub fn last_search_path(&self) -> Option<String> {
        self.store
            .get(LAST_PATH_KEY)
            .ok()
            .flatten()
            .filter(|p| !p.trim().is_empty())
    }

    pub fn save_last_search_path(&self, path: &str) -> Result<(), StoreError> {
        self.store.set(LAST_PATH_KEY, path)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(RESTORE_KEY)?;
        self.store.remove(LAST_PATH_KEY)
    }
}
