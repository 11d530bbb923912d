/// Failures of the remote catalog.
///
/// `Canceled` is never produced by the client itself; callers that abandon a
/// superseded request report it so it can be told apart from real failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("TMDB API key is missing (set TMDB_API_KEY or run `reelkeep config set-key`)")]
    ConfigurationMissing,

    #[error("TMDB request failed: {status}{}", .message.as_ref().map(|m| format!(" ({})", m)).unwrap_or_default())]
    RequestFailed { status: u16, message: Option<String> },

    #[error("Failed to parse TMDB response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("TMDB transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request canceled")]
    Canceled,
}

impl CatalogError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, CatalogError::Canceled)
    }

    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, CatalogError::ConfigurationMissing)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
