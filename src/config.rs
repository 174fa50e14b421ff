//! Application configuration.
//!
//! Read from `~/.fundfolio/config.toml` when present; every field has a
//! default so the file is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::db;
use crate::error::TrackerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file (default: ~/.fundfolio/data.db)
    pub db_path: Option<PathBuf>,

    /// Root of the raw-text archive (default: ~/.fundfolio/archive)
    pub archive_dir: Option<PathBuf>,

    /// Archive the raw text of every ingested batch
    pub archive_raw: bool,

    /// Entries per top/bottom list
    pub top_n: usize,

    /// Days covered by `analyze` when no start date is given
    pub lookback_days: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            archive_dir: None,
            archive_raw: true,
            top_n: 5,
            lookback_days: 7,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TrackerError::ConfigError(format!("{:?}: {}", path, e)))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load an explicit config file, or the default one if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = db::get_default_data_dir()?.join("config.toml");
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(p) => Ok(p.clone()),
            None => db::get_default_db_path(),
        }
    }

    pub fn resolved_archive_dir(&self) -> Result<PathBuf> {
        match &self.archive_dir {
            Some(p) => Ok(p.clone()),
            None => Ok(db::get_default_data_dir()?.join("archive")),
        }
    }
}
