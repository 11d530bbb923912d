//! In-memory catalog and fixtures shared by the unit tests.

use async_trait::async_trait;
use reelkeep_catalog::{Catalog, CatalogError, PosterSize};
use reelkeep_models::{
    CastMember, Credits, CrewMember, MovieDetails, MovieSummary, Paged, PersonCredit, PersonDetails,
    PersonMovieCredits, PersonSummary,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn movie(id: i64, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        release_date: Some("2021-10-22".to_string()),
        poster_path: None,
        overview: None,
        vote_average: Some(7.8),
        popularity: None,
    }
}

pub fn person(id: i64, name: &str) -> PersonSummary {
    PersonSummary {
        id,
        name: name.to_string(),
        known_for_department: Some("Directing".to_string()),
        profile_path: None,
        known_for: Vec::new(),
    }
}

fn paged<T>(results: Vec<T>) -> Paged<T> {
    let total = results.len() as u32;
    Paged {
        page: 1,
        results,
        total_pages: 1,
        total_results: total,
    }
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    ServerError,
    MissingKey,
}

/// Records every call as `"<operation>:<argument>"` and answers from fixtures.
/// Operations marked failing return a 500, or a missing key error.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    failing: Mutex<HashMap<&'static str, Failure>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request takes `delay` before answering
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation, Failure::ServerError);
    }

    pub fn fail_without_key(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation, Failure::MissingKey);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, operation: &'static str, arg: String) -> Result<(), CatalogError> {
        self.calls.lock().unwrap().push(format!("{}:{}", operation, arg));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failing.lock().unwrap().get(operation) {
            Some(Failure::ServerError) => Err(CatalogError::RequestFailed { status: 500, message: None }),
            Some(Failure::MissingKey) => Err(CatalogError::ConfigurationMissing),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn list_popular(&self, page: u32) -> Result<Paged<MovieSummary>, CatalogError> {
        self.record("list_popular", page.to_string()).await?;
        Ok(paged(vec![movie(1, "Popular One"), movie(2, "Popular Two")]))
    }

    async fn search_movies(&self, query: &str, _page: u32) -> Result<Paged<MovieSummary>, CatalogError> {
        self.record("search_movies", query.to_string()).await?;
        let results = (1..=30).map(|i| movie(100 + i, &format!("{} {}", query, i))).collect();
        Ok(paged(results))
    }

    async fn search_people(&self, query: &str, _page: u32) -> Result<Paged<PersonSummary>, CatalogError> {
        self.record("search_people", query.to_string()).await?;
        Ok(paged(vec![person(525, &format!("{} Person", query))]))
    }

    async fn get_movie(&self, id: i64) -> Result<MovieDetails, CatalogError> {
        self.record("get_movie", id.to_string()).await?;
        Ok(MovieDetails {
            id,
            title: format!("Movie {}", id),
            tagline: None,
            overview: Some("Overview".to_string()),
            release_date: Some("1999-03-30".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            vote_average: Some(8.2),
            runtime: Some(136),
            status: None,
            genres: Vec::new(),
        })
    }

    async fn get_movie_credits(&self, id: i64) -> Result<Credits, CatalogError> {
        self.record("get_movie_credits", id.to_string()).await?;
        let cast = (1..=12)
            .map(|i| CastMember {
                id: i,
                name: format!("Actor {}", i),
                character: None,
                profile_path: None,
                order: Some(i as u32 - 1),
            })
            .collect();
        let crew = vec![
            CrewMember { id: 90, name: "Producer P".to_string(), job: "Producer".to_string(), department: None },
            CrewMember { id: 91, name: "Assistant A".to_string(), job: "Assistant Director".to_string(), department: None },
            CrewMember { id: 92, name: "Director D".to_string(), job: "Director".to_string(), department: None },
            CrewMember { id: 93, name: "Director E".to_string(), job: "Director".to_string(), department: None },
        ];
        Ok(Credits { cast, crew })
    }

    async fn get_person(&self, id: i64) -> Result<PersonDetails, CatalogError> {
        self.record("get_person", id.to_string()).await?;
        Ok(PersonDetails {
            id,
            name: format!("Person {}", id),
            known_for_department: Some("Directing".to_string()),
            profile_path: None,
            biography: None,
            birthday: None,
            place_of_birth: None,
        })
    }

    async fn get_person_movie_credits(&self, id: i64) -> Result<PersonMovieCredits, CatalogError> {
        self.record("get_person_movie_credits", id.to_string()).await?;
        let credit = |id: Option<i64>, title: &str, popularity: f64| PersonCredit {
            id,
            title: title.to_string(),
            character: None,
            release_date: None,
            poster_path: None,
            overview: None,
            vote_average: None,
            popularity: Some(popularity),
        };
        Ok(PersonMovieCredits {
            cast: vec![
                credit(Some(1), "Low", 1.0),
                credit(None, "No Id", 99.0),
                credit(Some(2), "High", 50.0),
                credit(Some(3), "Mid", 10.0),
            ],
        })
    }

    fn poster_url(&self, path: &str, size: PosterSize) -> String {
        reelkeep_catalog::poster_url("https://img.test", path, size)
    }
}
