use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelkeep_core::pages::{MovieDetailsView, WatchlistStats};
use reelkeep_models::{MovieSummary, PersonSummary, WatchlistEntry};

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

fn rating(vote_average: Option<f64>) -> String {
    vote_average
        .filter(|v| *v > 0.0)
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

/// Numbered so the shell can refer to rows with `:open N`
pub fn movies_table(movies: &[MovieSummary], in_watchlist: impl Fn(i64) -> bool) -> Table {
    let mut t = table(&["#", "Id", "Title", "Year", "Rating", "Saved"]);
    for (i, movie) in movies.iter().enumerate() {
        t.add_row(vec![
            Cell::new(i + 1),
            Cell::new(movie.id),
            Cell::new(or_dash(&movie.title)),
            Cell::new(or_dash(movie.year())),
            Cell::new(rating(movie.vote_average)),
            Cell::new(if in_watchlist(movie.id) { "★" } else { "" }).fg(Color::Yellow),
        ]);
    }
    t
}

pub fn people_table(people: &[PersonSummary]) -> Table {
    let mut t = table(&["#", "Id", "Name", "Department", "Known for"]);
    for (i, person) in people.iter().enumerate() {
        t.add_row(vec![
            Cell::new(i + 1),
            Cell::new(person.id),
            Cell::new(&person.name),
            Cell::new(person.known_for_department.as_deref().unwrap_or("-")),
            Cell::new(person.known_for_line()),
        ]);
    }
    t
}

pub fn details_table(view: &MovieDetailsView, poster_url: &str, in_watchlist: bool) -> Table {
    let movie = &view.movie;
    let mut t = table(&[movie.title.as_str(), movie.year()]);

    if let Some(tagline) = movie.tagline.as_deref().filter(|s| !s.is_empty()) {
        t.add_row(vec![Cell::new("Tagline"), Cell::new(tagline).add_attribute(Attribute::Italic)]);
    }
    t.add_row(vec![Cell::new("Id"), Cell::new(movie.id)]);
    t.add_row(vec![Cell::new("Rating"), Cell::new(rating(movie.vote_average))]);
    if let Some(runtime) = movie.runtime.filter(|r| *r > 0) {
        t.add_row(vec![Cell::new("Runtime"), Cell::new(format!("{} min", runtime))]);
    }
    let genres = movie.genre_names().join(", ");
    t.add_row(vec![Cell::new("Genres"), Cell::new(or_dash(&genres))]);
    t.add_row(vec![Cell::new("Director"), Cell::new(or_dash(&view.director))]);

    let cast = view
        .cast
        .iter()
        .map(|c| match c.character.as_deref().filter(|s| !s.is_empty()) {
            Some(character) => format!("{} ({})", c.name, character),
            None => c.name.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    t.add_row(vec![Cell::new("Cast"), Cell::new(or_dash(&cast))]);
    t.add_row(vec![
        Cell::new("Overview"),
        Cell::new(or_dash(movie.overview.as_deref().unwrap_or(""))),
    ]);
    t.add_row(vec![Cell::new("Poster"), Cell::new(or_dash(poster_url))]);
    t.add_row(vec![
        Cell::new("Watchlist"),
        if in_watchlist {
            Cell::new("✓ saved").fg(Color::Green)
        } else {
            Cell::new("not saved").fg(Color::DarkGrey)
        },
    ]);
    t
}

pub fn watchlist_table(entries: &[&WatchlistEntry], saved_id: Option<i64>) -> Table {
    let mut t = table(&["Id", "Title", "Year", "Watched", "Rating", "Note", "Added"]);
    for entry in entries {
        let stars = entry
            .rating
            .map(|r| "★".repeat(r.min(5) as usize))
            .unwrap_or_default();
        let mut note = entry.note.clone();
        if saved_id == Some(entry.id) {
            note.push_str(" [Saved]");
        }
        let added = entry
            .added_at_utc()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        t.add_row(vec![
            Cell::new(entry.id),
            Cell::new(or_dash(&entry.title)),
            Cell::new(or_dash(entry.year())),
            if entry.watched {
                Cell::new("✓").fg(Color::Green)
            } else {
                Cell::new("")
            },
            Cell::new(stars).fg(Color::Yellow),
            Cell::new(note),
            Cell::new(added),
        ]);
    }
    t
}

pub fn stats_line(stats: &WatchlistStats) -> String {
    let average = stats
        .average_rating
        .map(|a| format!("{:.1}", a))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} total · {} watched · {} remaining · {}% done · avg rating {}",
        stats.total.bold(),
        stats.watched.green(),
        stats.remaining.yellow(),
        stats.progress,
        average
    )
}

pub fn recent_line(recent: &[String]) -> String {
    if recent.is_empty() {
        return "No recent searches".bright_black().to_string();
    }
    let items = recent
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}:{}", i + 1, q))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{} {}", "Recent:".bright_black(), items)
}
