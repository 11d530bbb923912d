use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, details, popular, search, shell, watchlist};

mod commands;
mod context;
mod logging;
mod output;
mod render;
mod session;
mod ui;

#[derive(Parser)]
#[command(name = "reelkeep")]
#[command(about = "ReelKeep - Find movies and keep a personal watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List popular movies
    Popular {
        /// Result page (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search movies or people
    #[command(long_about = "Search the catalog. A QUERY runs immediately and is recorded in recent searches. Without a QUERY the last search of this terminal session is restored silently. --location restores from a saved location such as \"?mode=person&q=Nolan\", and --back returns to the search a details view was opened from.")]
    Search {
        /// Search text
        query: Option<String>,

        /// Search mode: movie or person
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,

        /// Open this person's movies (person mode)
        #[arg(long, value_name = "ID")]
        person: Option<i64>,

        /// Restore from a location, e.g. "/search?mode=person&q=Nolan"
        #[arg(long, value_name = "LOCATION", conflicts_with = "back")]
        location: Option<String>,

        /// Return to the search the last details view was opened from
        #[arg(long, action = ArgAction::SetTrue)]
        back: bool,
    },
    /// Show a movie with director and top cast
    Details {
        /// TMDB movie id
        id: i64,

        /// Add the movie to the watchlist
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "remove")]
        add: bool,

        /// Remove the movie from the watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        remove: bool,
    },
    /// Manage the local watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Interactive search box
    #[command(long_about = "Interactive search. Every typed line replaces the query and runs a debounced search; an empty line searches immediately. Type :help for the list of commands.")]
    Shell,
    /// Configure the API key and show settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored data
    #[command(long_about = "Clear stored data. Use --recent to clear recent searches, --session to clear this terminal session's search state, --watchlist to delete the watchlist, or --all for everything.")]
    Clear {
        /// Clear everything
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear recent searches
        #[arg(long, action = ArgAction::SetTrue)]
        recent: bool,

        /// Clear this terminal session's search state
        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,

        /// Delete the watchlist
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List entries with progress stats
    List {
        /// all, watched or unwatched
        #[arg(long, default_value = "all")]
        filter: String,

        /// newest, az or watched-first
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Case-insensitive title filter
        #[arg(long)]
        query: Option<String>,
    },
    /// Add a movie by id
    Add { id: i64 },
    /// Remove a movie
    Remove { id: i64 },
    /// Mark a movie watched
    Watched {
        id: i64,

        /// Mark as not watched instead
        #[arg(long, action = ArgAction::SetTrue)]
        unset: bool,
    },
    /// Flip the watched flag
    Toggle { id: i64 },
    /// Rate 1-5, or "clear"
    Rate { id: i64, rating: String },
    /// Save a note (trailing whitespace is trimmed)
    Note { id: i64, text: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the full API key
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the TMDB API key
    #[command(long_about = "Store the TMDB API key in the credentials file. If KEY is omitted you are prompted for it without echo. The TMDB_API_KEY environment variable takes precedence over the stored key.")]
    SetKey {
        key: Option<String>,
    },
    /// Delete the stored TMDB API key
    RemoveKey,
    /// Write the settings in effect to config.toml
    #[command(long_about = "Write the settings currently in effect to config.toml so they can be edited. An existing file is left alone unless --force is given.")]
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print configuration, data and log locations
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let ctx = context::AppContext::load()?;

    logging::init_logging(cli.verbose, cli.quiet, &ctx.config.logging, ctx.log_file())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    ctx.log_startup();
    ctx.prune_sessions();

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Popular { page } => popular::run_popular(&ctx, page, &output).await,
        Commands::Search {
            query,
            mode,
            person,
            location,
            back,
        } => search::run_search(&ctx, query, mode, person, location, back, &output).await,
        Commands::Details { id, add, remove } => details::run_details(&ctx, id, add, remove, &output).await,
        Commands::Watchlist { cmd } => watchlist::run_watchlist(&ctx, cmd, &output).await,
        Commands::Shell => shell::run_shell(&ctx, &output).await,
        Commands::Config { cmd } => config::run_config(&ctx, cmd, &output),
        Commands::Clear {
            all,
            recent,
            session,
            watchlist,
        } => clear::run_clear(&ctx, all, recent, session, watchlist, &output),
    }
}
