use async_trait::async_trait;
use reelkeep_models::{
    Credits, MovieDetails, MovieSummary, Paged, PersonDetails, PersonMovieCredits, PersonSummary,
};
use crate::error::CatalogError;
use crate::images::PosterSize;

/// Read-only access to the remote movie catalog.
///
/// Implemented by [`crate::TmdbClient`]; page models depend on this trait so
/// tests can drive them with an in-memory catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_popular(&self, page: u32) -> Result<Paged<MovieSummary>, CatalogError>;
    async fn search_movies(&self, query: &str, page: u32) -> Result<Paged<MovieSummary>, CatalogError>;
    async fn search_people(&self, query: &str, page: u32) -> Result<Paged<PersonSummary>, CatalogError>;

    async fn get_movie(&self, id: i64) -> Result<MovieDetails, CatalogError>;
    async fn get_movie_credits(&self, id: i64) -> Result<Credits, CatalogError>;
    async fn get_person(&self, id: i64) -> Result<PersonDetails, CatalogError>;
    async fn get_person_movie_credits(&self, id: i64) -> Result<PersonMovieCredits, CatalogError>;

    /// Pure URL composition, no network access
    fn poster_url(&self, path: &str, size: PosterSize) -> String;
}
