use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Spinner;
use crate::WatchlistCommands;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use reelkeep_core::pages::{WatchFilter, WatchSort};
use reelkeep_models::MovieSummary;
use serde_json::json;

/// `1`-`5`, or `clear`/`none` to remove the rating
pub fn parse_rating(raw: &str) -> Result<Option<u8>> {
    match raw.trim().to_lowercase().as_str() {
        "clear" | "none" => Ok(None),
        other => match other.parse::<u8>() {
            Ok(n @ 1..=5) => Ok(Some(n)),
            _ => Err(eyre!("Rating must be 1-5 or 'clear', got '{}'", raw)),
        },
    }
}

fn not_found(id: i64) -> color_eyre::Report {
    eyre!("Movie {} is not on the watchlist", id)
}

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    match cmd {
        WatchlistCommands::List { filter, sort, query } => list(ctx, &filter, &sort, query, output),
        WatchlistCommands::Add { id } => add(ctx, id, output).await,
        WatchlistCommands::Remove { id } => {
            if !ctx.watchlist().remove(id).wrap_err("Failed to update watchlist")? {
                return Err(not_found(id));
            }
            output.success(format!("Removed {} from watchlist", id));
            Ok(())
        }
        WatchlistCommands::Watched { id, unset } => {
            if !ctx.watchlist().set_watched(id, !unset).wrap_err("Failed to update watchlist")? {
                return Err(not_found(id));
            }
            output.success(format!("Marked {} as {}", id, if unset { "not watched" } else { "watched" }));
            Ok(())
        }
        WatchlistCommands::Toggle { id } => {
            let mut page = ctx.watchlist_page();
            if !page.toggle_watched(id).wrap_err("Failed to update watchlist")? {
                return Err(not_found(id));
            }
            let watched = page.entries().iter().any(|e| e.id == id && e.watched);
            output.success(format!("Marked {} as {}", id, if watched { "watched" } else { "not watched" }));
            Ok(())
        }
        WatchlistCommands::Rate { id, rating } => {
            let rating = parse_rating(&rating)?;
            let mut page = ctx.watchlist_page();
            if !page.set_rating(id, rating).wrap_err("Failed to update watchlist")? {
                return Err(not_found(id));
            }
            match rating {
                Some(n) => output.success(format!("Rated {} {}/5", id, n)),
                None => output.success(format!("Cleared rating for {}", id)),
            }
            Ok(())
        }
        WatchlistCommands::Note { id, text } => {
            let mut page = ctx.watchlist_page();
            if !page.save_note(id, &text).wrap_err("Failed to update watchlist")? {
                return Err(not_found(id));
            }
            output.success("Saved");
            Ok(())
        }
    }
}

fn list(ctx: &AppContext, filter: &str, sort: &str, query: Option<String>, output: &Output) -> Result<()> {
    let mut page = ctx.watchlist_page();
    page.filter = filter.parse::<WatchFilter>().map_err(|e| eyre!(e))?;
    page.sort = sort.parse::<WatchSort>().map_err(|e| eyre!(e))?;
    page.query = query.unwrap_or_default();

    let stats = page.stats();
    let visible = page.visible();

    if output.is_json() {
        output.json(&json!({
            "filter": page.filter.as_str(),
            "sort": page.sort.as_str(),
            "stats": stats,
            "entries": visible,
        }));
        return Ok(());
    }

    if page.entries().is_empty() {
        output.info("Your watchlist is empty. Add movies with: reelkeep watchlist add <ID>");
        return Ok(());
    }
    if visible.is_empty() {
        output.info("No entries match");
    } else {
        output.info(render::watchlist_table(&visible, page.saved_id()).to_string());
    }
    output.info(render::stats_line(&stats));
    Ok(())
}

async fn add(ctx: &AppContext, id: i64, output: &Output) -> Result<()> {
    let spinner = Spinner::start(format!("Loading movie {}...", id), !output.is_json());
    let movie = ctx.catalog().get_movie(id).await;
    spinner.finish();
    let movie = movie.wrap_err_with(|| format!("Failed to load movie {}", id))?;

    let summary = MovieSummary::from(&movie);
    if ctx.watchlist().add(&summary).wrap_err("Failed to update watchlist")? {
        output.success(format!("Added {} to watchlist", summary.title));
    } else {
        output.info(format!("{} is already on the watchlist", summary.title));
    }
    Ok(())
}
