use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use reelkeep_catalog::{Catalog, PosterSize, TmdbClient};
use reelkeep_config::{resolve_api_key, Config, CredentialStore, PathManager};
use reelkeep_core::{
    DetailsPage, FileStore, HomePage, KeyValueStore, MemoryStore, RecentSearches, SearchPage, SessionStore,
    WatchlistPage, WatchlistStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Paths, settings and stores shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
    pub session_id: String,
    catalog: Arc<dyn Catalog>,
    durable: Arc<dyn KeyValueStore>,
    tab: Arc<dyn KeyValueStore>,
    /// Problems found before logging was initialised
    startup_warnings: Vec<String>,
}

/// Settings from `path`; a malformed file falls back to defaults with a warning
fn load_config(path: &Path, warnings: &mut Vec<String>) -> Config {
    let (config, problem) = Config::load_or_default(path);
    if let Some(e) = problem {
        warnings.push(format!("Failed to parse config file {}: {}. Using defaults.", path.display(), e));
    }
    config
}

/// Tab-scoped store in `dir`, or an in-process one when the directory is unusable
fn open_session_store(dir: &Path, warnings: &mut Vec<String>) -> Arc<dyn KeyValueStore> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Arc::new(FileStore::new(dir)),
        Err(e) => {
            warnings.push(format!(
                "Session directory {} is unusable ({}); search state will not outlive this command",
                dir.display(),
                e
            ));
            Arc::new(MemoryStore::new())
        }
    }
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create ReelKeep directories: {}", e))?;

        let mut startup_warnings = Vec::new();
        let config = load_config(&paths.config_file(), &mut startup_warnings);
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", paths.config_file().display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", paths.credentials_file().display(), e))?;

        let client = TmdbClient::from_config(&config.catalog, resolve_api_key(&credentials))
            .wrap_err("Failed to create TMDB client")?;

        let session_id = crate::session::session_id();
        let tab = open_session_store(&paths.session_dir(&session_id), &mut startup_warnings);

        Ok(Self {
            durable: Arc::new(FileStore::new(paths.store_dir())),
            tab,
            catalog: Arc::new(client),
            paths,
            config,
            credentials,
            session_id,
            startup_warnings,
        })
    }

    /// Call once the subscriber is installed
    pub fn log_startup(&self) {
        debug!(session = %self.session_id, "Using terminal session");
        for message in &self.startup_warnings {
            warn!("{}", message);
        }
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.config.logging.file.then(|| self.paths.log_file())
    }

    pub fn prune_sessions(&self) {
        crate::session::prune_sessions(&self.paths.sessions_dir(), &self.session_id);
    }

    pub fn catalog(&self) -> Arc<dyn Catalog> {
        self.catalog.clone()
    }

    pub fn poster_size(&self) -> PosterSize {
        self.config.catalog.poster_size.parse().unwrap_or_default()
    }

    pub fn poster_url(&self, path: Option<&str>) -> String {
        self.catalog.poster_url(path.unwrap_or(""), self.poster_size())
    }

    pub fn watchlist(&self) -> WatchlistStore {
        WatchlistStore::new(self.durable.clone())
    }

    pub fn recent(&self) -> RecentSearches {
        RecentSearches::with_limit(self.durable.clone(), self.config.search.recent_limit)
    }

    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.tab.clone())
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.catalog(), self.watchlist())
    }

    pub fn search_page(&self) -> SearchPage {
        let search = &self.config.search;
        SearchPage::new(
            self.catalog(),
            self.recent(),
            self.session(),
            Duration::from_millis(search.debounce_ms),
            search.max_results,
            search.person_credits_limit,
        )
    }

    pub fn details_page(&self) -> DetailsPage {
        DetailsPage::new(self.catalog(), self.watchlist())
    }

    pub fn watchlist_page(&self) -> WatchlistPage {
        WatchlistPage::new(self.watchlist())
    }
}
