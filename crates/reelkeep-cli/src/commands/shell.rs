use super::search::{parse_mode, show_page};
use crate::context::AppContext;
use crate::output::Output;
use crate::render;
use crate::ui::Spinner;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use owo_colors::OwoColorize;
use reelkeep_core::location::SEARCH_PATH;
use reelkeep_core::{Location, SearchOutcome, SearchPage};
use reelkeep_models::{MovieSummary, SearchMode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "\
Type to search (debounced), empty line to search now.
  :mode [movie|person]  switch mode
  :open N               details for result N
  :save N               add or remove result N on the watchlist
  :person N             movies of person N
  :back                 close the selected person
  :recent [N]           list recent searches, or run number N
  :clear                clear query, results, recent and session state
  :quit                 leave";

enum Event {
    Line(Option<String>),
    Outcome(SearchOutcome),
}

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Query(String),
    Submit,
    Mode(Option<String>),
    Open(usize),
    Save(usize),
    Person(usize),
    Back,
    Recent(Option<usize>),
    Clear,
    Help,
    Quit,
}

fn parse_index(arg: Option<&str>, name: &str) -> std::result::Result<usize, String> {
    arg.and_then(|a| a.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("Usage: :{} N", name))
}

fn parse_line(line: &str) -> std::result::Result<ShellCommand, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(if line.trim().is_empty() {
            ShellCommand::Submit
        } else {
            ShellCommand::Query(line.to_string())
        });
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();
    match name {
        "mode" | "m" => Ok(ShellCommand::Mode(arg.map(str::to_string))),
        "open" | "o" => parse_index(arg, "open").map(ShellCommand::Open),
        "save" | "s" => parse_index(arg, "save").map(ShellCommand::Save),
        "person" | "p" => parse_index(arg, "person").map(ShellCommand::Person),
        "back" | "b" => Ok(ShellCommand::Back),
        "recent" | "r" => match arg {
            None => Ok(ShellCommand::Recent(None)),
            Some(_) => parse_index(arg, "recent").map(|n| ShellCommand::Recent(Some(n))),
        },
        "clear" => Ok(ShellCommand::Clear),
        "help" | "h" | "?" => Ok(ShellCommand::Help),
        "quit" | "q" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command :{} (try :help)", other)),
    }
}

/// The movie list rows refer to: the selected person's movies when open
fn visible_movies(page: &SearchPage) -> &[MovieSummary] {
    if page.selected_person.is_some() {
        &page.person_movies
    } else {
        &page.movies
    }
}

fn prompt(page: &SearchPage, output: &Output) -> Result<()> {
    output
        .prompt(format!("{} {}> ", format!("[{}]", page.mode).cyan(), page.query))
        .wrap_err("Failed to write prompt")
}

pub async fn run_shell(ctx: &AppContext, output: &Output) -> Result<()> {
    if output.is_json() {
        return Err(eyre!("The shell only supports human output"));
    }

    let location = ctx
        .session()
        .last_search_path()
        .map(|p| Location::parse(&p))
        .unwrap_or_else(|| Location::new(SEARCH_PATH));

    let mut page = ctx.search_page();
    page.mount(None, location).await;
    page.settle().await;

    output.info(HELP.bright_black().to_string());
    show_page(ctx, &page, output);
    prompt(&page, output)?;

    let (tx, mut lines) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let event = tokio::select! {
            line = lines.recv() => Event::Line(line),
            Some(outcome) = page.next_outcome() => Event::Outcome(outcome),
        };

        match event {
            Event::Line(None) => break,
            Event::Line(Some(line)) => {
                match parse_line(&line) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => handle(ctx, &mut page, command, output).await?,
                    Err(msg) => output.warn(msg),
                }
                prompt(&page, output)?;
            }
            Event::Outcome(outcome) => {
                if page.apply(outcome) {
                    output.info("");
                    show_page(ctx, &page, output);
                    prompt(&page, output)?;
                }
            }
        }
    }

    debug!("Shell closed");
    Ok(())
}

async fn handle(ctx: &AppContext, page: &mut SearchPage, command: ShellCommand, output: &Output) -> Result<()> {
    match command {
        ShellCommand::Query(text) => page.set_query(&text),
        ShellCommand::Submit => page.submit(),
        ShellCommand::Mode(arg) => {
            let mode = match arg {
                Some(raw) => match parse_mode(&raw) {
                    Ok(mode) => mode,
                    Err(e) => {
                        output.warn(e.to_string());
                        return Ok(());
                    }
                },
                None if page.mode == SearchMode::Movie => SearchMode::Person,
                None => SearchMode::Movie,
            };
            page.set_mode(mode);
            show_page(ctx, page, output);
        }
        ShellCommand::Open(n) => {
            let Some(movie) = visible_movies(page).get(n - 1) else {
                output.warn(format!("No movie {}", n));
                return Ok(());
            };
            let mut details = ctx.details_page();
            let spinner = Spinner::start(format!("Loading {}...", movie.title), true);
            details.load(movie.id).await;
            spinner.finish();

            match (&details.view, &details.error) {
                (Some(view), _) => {
                    let poster = ctx.poster_url(view.movie.poster_path.as_deref());
                    output.info(render::details_table(view, &poster, details.in_watchlist()).to_string());
                }
                (None, Some(err)) => output.warn(err),
                (None, None) => {}
            }
        }
        ShellCommand::Save(n) => {
            let Some(movie) = visible_movies(page).get(n - 1).cloned() else {
                output.warn(format!("No movie {}", n));
                return Ok(());
            };
            if ctx.home_page().toggle_watchlist(&movie).wrap_err("Failed to update watchlist")? {
                output.success(format!("Added {} to watchlist", movie.title));
            } else {
                output.success(format!("Removed {} from watchlist", movie.title));
            }
        }
        ShellCommand::Person(n) => {
            if page.mode != SearchMode::Person {
                output.warn("Switch to person mode first (:mode person)");
                return Ok(());
            }
            let Some(person) = page.people.get(n - 1).cloned() else {
                output.warn(format!("No person {}", n));
                return Ok(());
            };
            let spinner = Spinner::start(format!("Loading movies with {}...", person.name), true);
            page.open_person(person).await;
            spinner.finish();
            show_page(ctx, page, output);
        }
        ShellCommand::Back => {
            page.close_person();
            show_page(ctx, page, output);
        }
        ShellCommand::Recent(None) => output.info(render::recent_line(&page.recent)),
        ShellCommand::Recent(Some(n)) => match page.recent.get(n - 1).cloned() {
            Some(query) => page.pick_recent(&query),
            None => output.warn(format!("No recent search {}", n)),
        },
        ShellCommand::Clear => {
            page.clear();
            output.success("Cleared");
        }
        ShellCommand::Help => output.info(HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("Matrix"), Ok(ShellCommand::Query("Matrix".to_string())));
        assert_eq!(parse_line("  "), Ok(ShellCommand::Submit));
        assert_eq!(parse_line(":open 3"), Ok(ShellCommand::Open(3)));
        assert_eq!(parse_line(":mode person"), Ok(ShellCommand::Mode(Some("person".to_string()))));
        assert_eq!(parse_line(":mode"), Ok(ShellCommand::Mode(None)));
        assert_eq!(parse_line(":recent"), Ok(ShellCommand::Recent(None)));
        assert_eq!(parse_line(":recent 2"), Ok(ShellCommand::Recent(Some(2))));
        assert_eq!(parse_line(":q"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line(":open").is_err());
        assert!(parse_line(":open 0").is_err());
        assert!(parse_line(":person x").is_err());
        assert!(parse_line(":frobnicate").is_err());
    }
}
