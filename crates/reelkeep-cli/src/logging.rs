use anyhow::Result;
use reelkeep_config::LoggingConfig;
use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Filter directives for the verbosity flags.
/// 0 = configured level, 1 = debug with hyper's connection chatter suppressed, 2+ = trace.
fn filter_directives(verbose_level: u8, quiet: bool, configured: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose_level {
        0 => configured.to_string(),
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn".to_string(),
        _ => "trace".to_string(),
    }
}

/// JSON when `RUST_LOG_JSON` says so, else the config's choice, else when
/// stdout is not a terminal
fn use_json(config: &LoggingConfig) -> bool {
    match std::env::var("RUST_LOG_JSON") {
        Ok(v) => v == "true",
        Err(_) => config.json.unwrap_or_else(|| !io::stdout().is_terminal()),
    }
}

/// Rotation prefix for a log file, e.g. "reelkeep" for "reelkeep.log"
fn rotation_prefix(log_path: &Path) -> Result<(&Path, &str)> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
    let prefix = log_filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(log_filename);
    Ok((log_dir, prefix))
}

pub fn init_logging(verbose_level: u8, quiet: bool, config: &LoggingConfig, log_file: Option<PathBuf>) -> Result<()> {
    // -q always wins over RUST_LOG
    let directives = filter_directives(verbose_level, quiet, &config.level);
    let filter = if quiet {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    };

    let json = use_json(config);
    let registry = Registry::default().with(filter);

    // Logs go to stderr so they never mix with command output on stdout
    if let Some(log_path) = log_file {
        std::fs::create_dir_all(log_path.parent().unwrap_or_else(|| Path::new(".")))?;
        let (log_dir, prefix) = rotation_prefix(&log_path)?;
        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, prefix);

        if json {
            let json_layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);
            registry.with(json_layer).try_init()?;
        } else {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);
            registry.with(fmt_layer).try_init()?;
        }
    } else if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(json_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
