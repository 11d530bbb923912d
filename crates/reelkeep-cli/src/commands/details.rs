use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Spinner;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use serde_json::json;

pub async fn run_details(ctx: &AppContext, id: i64, add: bool, remove: bool, output: &Output) -> Result<()> {
    let mut page = ctx.details_page();

    let spinner = Spinner::start(format!("Loading movie {}...", id), !output.is_json());
    page.load(id).await;
    spinner.finish();

    if let Some(err) = &page.error {
        return Err(eyre!("{}", err));
    }
    let Some(view) = page.view.as_ref() else {
        return Err(eyre!("Movie {} did not load", id));
    };

    if (add || remove) && page.in_watchlist() != add {
        let saved = page.toggle_watchlist().wrap_err("Failed to update watchlist")?;
        if saved {
            output.success(format!("Added {} to watchlist", view.movie.title));
        } else {
            output.success(format!("Removed {} from watchlist", view.movie.title));
        }
    } else if add {
        output.info(format!("{} is already on the watchlist", view.movie.title));
    } else if remove {
        output.info(format!("{} is not on the watchlist", view.movie.title));
    }

    let poster = ctx.poster_url(view.movie.poster_path.as_deref());
    let in_watchlist = page.in_watchlist();
    let table = render::details_table(view, &poster, in_watchlist);
    output.render(
        &table,
        &json!({
            "movie": view.movie,
            "director": view.director,
            "cast": view.cast,
            "poster_url": poster,
            "in_watchlist": in_watchlist,
        }),
    );

    if !output.is_json() {
        if let Some(nav) = page.back_navigation(&ctx.session()) {
            output.info(format!("Back to {} with: reelkeep search --back", nav.from));
        }
    }
    Ok(())
}
