use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_person_credits_limit")]
    pub person_credits_limit: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: Option<bool>, // None = decide from terminal
    #[serde(default)]
    pub file: bool,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_poster_size() -> String {
    "w342".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_max_results() -> usize {
    24
}

fn default_person_credits_limit() -> usize {
    30
}

fn default_recent_limit() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            poster_size: default_poster_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_results: default_max_results(),
            person_credits_limit: default_person_credits_limit(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: None,
            file: false,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Missing file means defaults. A malformed file also means defaults,
    /// returned with the parse error so the caller can report it once
    /// logging is set up.
    pub fn load_or_default(path: &Path) -> (Self, Option<anyhow::Error>) {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return (Self::default(), None);
        }
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if self.catalog.image_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.image_base_url cannot be empty"));
        }
        if self.search.max_results == 0 {
            return Err(anyhow::anyhow!("search.max_results must be at least 1"));
        }
        if self.search.recent_limit == 0 {
            return Err(anyhow::anyhow!("search.recent_limit must be at least 1"));
        }
        Ok(())
    }
}
