use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use crate::movie::MovieSummary;

/// One saved movie in the local watchlist.
///
/// Metadata fields are captured when the movie is added and never refreshed.
/// `rating` is not tied to `watched` here; callers decide whether to allow
/// rating an unwatched entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub watched: bool,
    #[serde(default)]
    pub rating: Option<u8>, // 1-5
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(rename = "addedAt", default)]
    pub added_at: i64, // epoch millis
}

impl WatchlistEntry {
    pub fn from_movie(movie: &MovieSummary, added_at: i64) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date.clone().unwrap_or_default(),
            poster_path: movie.poster_path.clone().unwrap_or_default(),
            overview: movie.overview.clone().unwrap_or_default(),
            vote_average: movie.vote_average,
            watched: false,
            rating: None,
            note: String::new(),
            added_at,
        }
    }

    pub fn year(&self) -> &str {
        release_year(&self.release_date)
    }

    pub fn added_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.added_at).single()
    }
}

/// Leading four characters of a release date, shown as-is even when they
/// are not a valid year
pub fn release_year(release_date: &str) -> &str {
    match release_date.char_indices().nth(4) {
        Some((idx, _)) => &release_date[..idx],
        None => release_date,
    }
}

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
