//! Deciding the search page's initial state on mount.

use crate::location::Location;
use reelkeep_models::{NavState, SearchMode, SearchRestoreState};

/// Restore state carried by a location's `mode` and `q` parameters.
///
/// Present only when `mode` is a known token or `q` is non-empty. `people`
/// reads as `person`; a missing or unknown mode reads as `movie`. A location
/// never selects a person.
pub fn url_restore(location: &Location) -> Option<SearchRestoreState> {
    let raw_mode = location.get("mode").filter(|m| !m.is_empty());
    let mode = raw_mode.and_then(SearchMode::parse);
    let q = location.get("q").unwrap_or("");

    let known_mode = matches!(raw_mode, Some("movie" | "person" | "people"));
    if !known_mode && q.is_empty() {
        return None;
    }

    Some(SearchRestoreState::new(mode.unwrap_or(SearchMode::Movie), q))
}

/// Pick the initial search state from three sources, highest priority first:
/// navigation state, location parameters, tab-scoped stored state.
/// `None` when no source has anything to offer.
pub fn resolve_initial_state(
    nav: Option<&NavState>,
    location: &Location,
    stored: Option<SearchRestoreState>,
) -> Option<SearchRestoreState> {
    let resolved = nav
        .map(|n| n.restore.clone())
        .or_else(|| url_restore(location))
        .or(stored)?;

    let person = resolved.selected_person_id;
    Some(SearchRestoreState::new(resolved.mode, resolved.q).with_person(person))
}
