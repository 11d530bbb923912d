pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{CatalogConfig, Config, LoggingConfig, SearchConfig};
pub use credentials::{API_KEY_ENV, CredentialStore, resolve_api_key};
pub use paths::{PathManager, base_path_override};
