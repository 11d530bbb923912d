use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Spinner;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use owo_colors::OwoColorize;
use reelkeep_core::location::SEARCH_PATH;
use reelkeep_core::{Location, SearchPage};
use reelkeep_models::{PersonSummary, SearchMode};
use serde_json::json;
use std::collections::HashSet;

pub fn parse_mode(raw: &str) -> Result<SearchMode> {
    SearchMode::parse(raw).ok_or_else(|| eyre!("Unknown search mode '{}' (expected movie or person)", raw))
}

pub async fn run_search(
    ctx: &AppContext,
    query: Option<String>,
    mode: Option<String>,
    person: Option<i64>,
    location: Option<String>,
    back: bool,
    output: &Output,
) -> Result<()> {
    let mut mode = mode.as_deref().map(parse_mode).transpose()?;
    if person.is_some() && mode.is_none() {
        mode = Some(SearchMode::Person);
    }

    let nav = if back {
        let nav = ctx.details_page().back_navigation(&ctx.session());
        if nav.is_none() {
            output.warn("Nothing to go back to in this terminal session");
        }
        nav
    } else {
        None
    };
    let location = location
        .as_deref()
        .map(Location::parse)
        .unwrap_or_else(|| Location::new(SEARCH_PATH));

    let mut page = ctx.search_page();
    let spinner = Spinner::start("Searching...", !output.is_json());

    page.mount(nav.as_ref(), location).await;
    if let Some(mode) = mode {
        page.set_mode(mode);
    }
    if let Some(query) = query {
        page.set_query(&query);
        page.submit();
    }
    page.settle().await;

    if let Some(person_id) = person {
        spinner.set_message("Loading person...");
        let details = ctx
            .catalog()
            .get_person(person_id)
            .await
            .wrap_err_with(|| format!("Failed to load person {}", person_id))?;
        page.open_person(PersonSummary::from(&details)).await;
    }
    spinner.finish();

    show_page(ctx, &page, output);

    match &page.error {
        Some(err) => Err(eyre!("{}", err)),
        None => Ok(()),
    }
}

/// Print the search screen: results for the active mode, the selected
/// person's movies and the recent searches
pub fn show_page(ctx: &AppContext, page: &SearchPage, output: &Output) {
    if output.is_json() {
        output.json(&json!({
            "location": page.location.to_string(),
            "mode": page.mode,
            "query": page.query,
            "movies": page.movies,
            "people": page.people,
            "selected_person": page.selected_person,
            "person_movies": page.person_movies,
            "recent": page.recent,
            "error": page.error,
        }));
        return;
    }

    let saved: HashSet<i64> = ctx.watchlist().list().iter().map(|e| e.id).collect();

    output.info(format!(
        "{} {}",
        format!("[{}]", page.mode).cyan(),
        page.location.to_string().bright_black()
    ));

    match page.mode {
        SearchMode::Movie if !page.movies.is_empty() => {
            output.info(render::movies_table(&page.movies, |id| saved.contains(&id)).to_string());
        }
        SearchMode::Person if !page.people.is_empty() => {
            output.info(render::people_table(&page.people).to_string());
        }
        _ if page.query.trim().is_empty() => output.info("Type to search".bright_black().to_string()),
        _ if page.error.is_none() => output.info("No results".bright_black().to_string()),
        _ => {}
    }

    if let Some(person) = &page.selected_person {
        output.info(format!("Movies with {}", person.name.bold()));
        if page.person_movies.is_empty() && page.error.is_none() {
            output.info("No movies found".bright_black().to_string());
        } else if !page.person_movies.is_empty() {
            output.info(render::movies_table(&page.person_movies, |id| saved.contains(&id)).to_string());
        }
    }

    if let Some(err) = &page.error {
        output.warn(err);
    }
    output.info(render::recent_line(&page.recent));
}
