//! Terminal-session identity for tab-scoped search state.
//!
//! A session is the shell that runs `reelkeep`: its state lives under
//! `<data>/sessions/<id>` and disappears once that shell exits.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const SESSION_ENV: &str = "REELKEEP_SESSION";

/// `REELKEEP_SESSION` when set, else the parent process id
pub fn session_id() -> String {
    if let Ok(id) = std::env::var(SESSION_ENV) {
        let id = id.trim();
        if !id.is_empty() {
            return sanitize(id);
        }
    }
    parent_pid()
}

#[cfg(unix)]
fn parent_pid() -> String {
    nix::unistd::getppid().to_string()
}

#[cfg(not(unix))]
fn parent_pid() -> String {
    "default".to_string()
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(unix)]
fn process_alive(pid: i32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // EPERM means the process exists but belongs to someone else
    !matches!(kill(Pid::from_raw(pid), None), Err(Errno::ESRCH))
}

#[cfg(not(unix))]
fn process_alive(_pid: i32) -> bool {
    true
}

/// Remove session directories named after processes that no longer exist.
/// Named sessions (from `REELKEEP_SESSION`) are kept. Returns how many were removed.
pub fn prune_sessions(sessions_dir: &Path, current: &str) -> usize {
    let entries = match fs::read_dir(sessions_dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if name == current {
            continue;
        }
        let Ok(pid) = name.parse::<i32>() else {
            continue;
        };
        if pid <= 0 || process_alive(pid) {
            continue;
        }

        match fs::remove_dir_all(entry.path()) {
            Ok(()) => {
                debug!("Pruned stale session {}", name);
                removed += 1;
            }
            Err(e) => warn!("Failed to prune session {}: {}", name, e),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("tab-1_a"), "tab-1_a");
        assert_eq!(sanitize("../etc"), "___etc");
    }

    #[cfg(unix)]
    #[test]
    fn test_prune_keeps_live_current_and_named() {
        let dir = TempDir::new().unwrap();
        let own = std::process::id().to_string();
        for name in [own.as_str(), "2147483000", "named", "4000000"] {
            fs::create_dir_all(dir.path().join(name)).unwrap();
        }

        let removed = prune_sessions(dir.path(), "4000000");

        assert_eq!(removed, 1);
        assert!(dir.path().join(&own).exists());
        assert!(dir.path().join("named").exists());
        assert!(dir.path().join("4000000").exists());
        assert!(!dir.path().join("2147483000").exists());
    }

    #[test]
    fn test_prune_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(prune_sessions(&dir.path().join("nope"), "1"), 0);
    }
}
