use crate::context::AppContext;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use reelkeep_config::{CredentialStore, API_KEY_ENV};
use serde_json::json;

pub fn run_config(ctx: &AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::SetKey { key } => set_key(ctx, key, output),
        ConfigCommands::RemoveKey => remove_key(ctx, output),
        ConfigCommands::Init { force } => init_config(ctx, force, output),
        ConfigCommands::Path => show_paths(ctx, output),
    }
}

fn section(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Where the API key in effect comes from
fn api_key_source(ctx: &AppContext) -> (&'static str, Option<String>) {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return ("environment", Some(key));
        }
    }
    match ctx.credentials.get_api_key() {
        Some(key) => ("credentials file", Some(key.clone())),
        None => ("not set", None),
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let (source, key) = api_key_source(ctx);
    let key_display = match &key {
        Some(k) if full => k.clone(),
        Some(k) => mask_string(k),
        None => "<not set>".to_string(),
    };

    if output.is_json() {
        output.json(&json!({
            "config_file": ctx.paths.config_file(),
            "api_key": key_display,
            "api_key_source": source,
            "config": config,
        }));
        return Ok(());
    }

    let mut catalog = section("Catalog");
    catalog.add_row(vec![Cell::new("API key"), Cell::new(format!("{} ({})", key_display, source))]);
    catalog.add_row(vec![Cell::new("Base URL"), Cell::new(&config.catalog.base_url)]);
    catalog.add_row(vec![Cell::new("Image base URL"), Cell::new(&config.catalog.image_base_url)]);
    catalog.add_row(vec![Cell::new("Language"), Cell::new(&config.catalog.language)]);
    catalog.add_row(vec![Cell::new("Poster size"), Cell::new(&config.catalog.poster_size)]);
    catalog.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.catalog.timeout_secs))]);

    let mut search = section("Search");
    search.add_row(vec![Cell::new("Debounce"), Cell::new(format!("{} ms", config.search.debounce_ms))]);
    search.add_row(vec![Cell::new("Max results"), Cell::new(config.search.max_results)]);
    search.add_row(vec![Cell::new("Person movies"), Cell::new(config.search.person_credits_limit)]);
    search.add_row(vec![Cell::new("Recent searches"), Cell::new(config.search.recent_limit)]);

    let mut logging = section("Logging");
    logging.add_row(vec![Cell::new("Level"), Cell::new(&config.logging.level)]);
    let json_mode = match config.logging.json {
        Some(true) => "json",
        Some(false) => "text",
        None => "auto",
    };
    logging.add_row(vec![Cell::new("Format"), Cell::new(json_mode)]);
    logging.add_row(vec![
        Cell::new("Log file"),
        Cell::new(if config.logging.file { ctx.paths.log_file().display().to_string() } else { "off".to_string() }),
    ]);

    output.info(format!("Config file: {}", ctx.paths.config_file().display()));
    for table in [catalog, search, logging] {
        output.info(table.to_string());
    }
    Ok(())
}

fn set_key(ctx: &AppContext, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(k) => k,
        None => rpassword::prompt_password("TMDB API key: ")
            .map_err(|e| eyre!("Failed to read API key: {}", e))?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    let path = ctx.paths.credentials_file();
    let mut store = CredentialStore::new(path.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", path.display(), e))?;
    store.set_api_key(key);
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", path.display(), e))?;

    output.success(format!("API key saved to {}", path.display()));
    if std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
    }
    Ok(())
}

fn remove_key(ctx: &AppContext, output: &Output) -> Result<()> {
    let path = ctx.paths.credentials_file();
    let mut store = CredentialStore::new(path.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", path.display(), e))?;
    if store.get_api_key().is_none() {
        output.info("No stored API key");
        return Ok(());
    }
    store.remove_api_key();
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", path.display(), e))?;

    output.success(format!("API key removed from {}", path.display()));
    if std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        output.warn(format!("{} is still set in the environment", API_KEY_ENV));
    }
    Ok(())
}

fn init_config(ctx: &AppContext, force: bool, output: &Output) -> Result<()> {
    let path = ctx.paths.config_file();
    if path.exists() && !force {
        return Err(eyre!("{} already exists (use --force to overwrite)", path.display()));
    }
    ctx.config
        .save_to_file(&path)
        .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;
    output.success(format!("Configuration written to {}", path.display()));
    Ok(())
}

fn show_paths(ctx: &AppContext, output: &Output) -> Result<()> {
    let paths = &ctx.paths;
    let session_dir = paths.session_dir(&ctx.session_id);
    let rows = [
        ("Config file", paths.config_file()),
        ("Credentials", paths.credentials_file()),
        ("Data", paths.data_dir().to_path_buf()),
        ("Session", session_dir),
        ("Logs", paths.log_dir().to_path_buf()),
    ];

    if output.is_json() {
        let map: serde_json::Map<String, serde_json::Value> = rows
            .iter()
            .map(|(name, path)| (name.to_lowercase().replace(' ', "_"), json!(path)))
            .collect();
        output.json(&map);
        return Ok(());
    }

    let mut table = section("Paths");
    for (name, path) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(path.display())]);
    }
    output.info(table.to_string());
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
