use crate::api::{self, Endpoint};
use crate::error::CatalogError;
use crate::images::{self, PosterSize};
use crate::traits::Catalog;
use async_trait::async_trait;
use reelkeep_config::CatalogConfig;
use reelkeep_models::{
    Credits, MovieDetails, MovieSummary, Paged, PersonDetails, PersonMovieCredits, PersonSummary,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Error payload TMDB returns alongside non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbClient {
    /// The key is checked per request, so a client without one still builds
    pub fn from_config(config: &CatalogConfig, api_key: Option<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("reelkeep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
            base_url: config.base_url.clone(),
            image_base_url: config.image_base_url.clone(),
            language: config.language.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.api_key.as_deref().ok_or(CatalogError::ConfigurationMissing)
    }

    async fn request<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T, CatalogError> {
        let api_key = self.api_key()?;
        let url = api::build_url(&self.base_url, &endpoint, api_key, &self.language);
        let path = endpoint.path();

        debug!(path = %path, "TMDB request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .filter(|m| !m.is_empty());
            warn!(path = %path, status = status.as_u16(), "TMDB request failed");
            return Err(CatalogError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn list_popular(&self, page: u32) -> Result<Paged<MovieSummary>, CatalogError> {
        self.request(Endpoint::Popular { page }).await
    }

    async fn search_movies(&self, query: &str, page: u32) -> Result<Paged<MovieSummary>, CatalogError> {
        self.request(Endpoint::SearchMovies { query, page }).await
    }

    async fn search_people(&self, query: &str, page: u32) -> Result<Paged<PersonSummary>, CatalogError> {
        self.request(Endpoint::SearchPeople { query, page }).await
    }

    async fn get_movie(&self, id: i64) -> Result<MovieDetails, CatalogError> {
        self.request(Endpoint::Movie(id)).await
    }

    async fn get_movie_credits(&self, id: i64) -> Result<Credits, CatalogError> {
        self.request(Endpoint::MovieCredits(id)).await
    }

    async fn get_person(&self, id: i64) -> Result<PersonDetails, CatalogError> {
        self.request(Endpoint::Person(id)).await
    }

    async fn get_person_movie_credits(&self, id: i64) -> Result<PersonMovieCredits, CatalogError> {
        self.request(Endpoint::PersonMovieCredits(id)).await
    }

    fn poster_url(&self, path: &str, size: PosterSize) -> String {
        images::poster_url(&self.image_base_url, path, size)
    }
}
