use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Spinner;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

pub async fn run_popular(ctx: &AppContext, page: u32, output: &Output) -> Result<()> {
    let mut home = ctx.home_page();

    let spinner = Spinner::start("Loading popular movies...", !output.is_json());
    home.load(page).await;
    spinner.finish();

    if let Some(err) = &home.error {
        return Err(eyre!("Failed to load popular movies: {}", err));
    }

    let table = render::movies_table(&home.movies, |id| home.in_watchlist(id));
    output.render(&table, &json!({ "page": page.max(1), "results": home.movies }));
    Ok(())
}
