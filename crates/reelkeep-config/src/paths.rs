use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, used by tests and containerised runs
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("REELKEEP_BASE_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reelkeep");

        Ok(Self::from_base(base_dir))
    }

    /// Config files at the base level, data and logs in subdirectories
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Durable key-value store (watchlist, recent searches)
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Parent of all tab-scoped session stores
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.sessions_dir().join(session_id)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("reelkeep.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.store_dir())?;
        std::fs::create_dir_all(self.sessions_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths (e.g., ~/.config/reelkeep on Linux)
        Self::new().unwrap_or_else(|_| Self::from_base(std::env::temp_dir().join("reelkeep")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::from_base("/tmp/rk");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/rk/config.toml"));
        assert_eq!(paths.store_dir(), PathBuf::from("/tmp/rk/data/store"));
        assert_eq!(paths.session_dir("123"), PathBuf::from("/tmp/rk/data/sessions/123"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/rk/logs/reelkeep.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path());
        paths.ensure_directories().unwrap();
        assert!(paths.store_dir().is_dir());
        assert!(paths.sessions_dir().is_dir());
    }
}
