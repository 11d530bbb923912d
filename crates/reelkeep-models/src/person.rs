use serde::{Deserialize, Serialize};
use crate::movie::MovieSummary;
use crate::watchlist::null_as_default;

/// A titled work listed under `known_for` in person search results.
/// Movies carry `title`, TV entries carry `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnownFor {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl KnownFor {
    pub fn label(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for: Vec<KnownFor>,
}

impl PersonSummary {
    /// Up to three known-for titles joined for display
    pub fn known_for_line(&self) -> String {
        self.known_for
            .iter()
            .take(3)
            .filter_map(|k| k.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
}

impl From<&PersonDetails> for PersonSummary {
    fn from(person: &PersonDetails) -> Self {
        Self {
            id: person.id,
            name: person.name.clone(),
            known_for_department: person.known_for_department.clone(),
            profile_path: person.profile_path.clone(),
            known_for: Vec::new(),
        }
    }
}

/// One movie in a person's filmography
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonCredit {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

impl PersonCredit {
    /// Converts to a listing entry; credits without an id are not addressable
    pub fn to_summary(&self) -> Option<MovieSummary> {
        let id = self.id.filter(|id| *id != 0)?;
        Some(MovieSummary {
            id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
            overview: self.overview.clone(),
            vote_average: self.vote_average,
            popularity: self.popularity,
        })
    }
}

/// Response of `/person/{id}/movie_credits`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonMovieCredits {
    #[serde(default)]
    pub cast: Vec<PersonCredit>,
}
