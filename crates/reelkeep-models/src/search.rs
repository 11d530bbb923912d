use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog resource the search box queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Movie,
    #[serde(alias = "people")]
    Person,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Movie => "movie",
            SearchMode::Person => "person",
        }
    }

    /// Parse a mode token as it appears in a location or on the command line.
    /// `people` is accepted as an alias for `person`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Some(SearchMode::Movie),
            "person" | "people" => Some(SearchMode::Person),
            _ => None,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab-scoped snapshot of the search box, used to reproduce a prior search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SearchRestoreState {
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub q: String,
    #[serde(rename = "selectedPersonId", default)]
    pub selected_person_id: Option<i64>,
}

impl SearchRestoreState {
    pub fn new(mode: SearchMode, q: impl Into<String>) -> Self {
        Self {
            mode,
            q: q.into(),
            selected_person_id: None,
        }
    }

    pub fn with_person(mut self, person_id: Option<i64>) -> Self {
        self.selected_person_id = person_id.filter(|id| *id != 0);
        self
    }

    pub fn has_query(&self) -> bool {
        !self.q.trim().is_empty()
    }
}

/// State attached to a navigation, e.g. the details page "back" action
/// carrying the exact search to return to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavState {
    #[serde(default)]
    pub from: String,
    pub restore: SearchRestoreState,
}
