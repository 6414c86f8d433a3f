// src/config.rs
//! Runtime configuration
//!
//! Settings come from a TOML file. The file is looked up from, in order:
//! the `--config` flag, the `MIRRORCTL_CONFIG` environment variable, and
//! `/etc/mirrorctl/mirrorctl.toml`. With none present the defaults apply.

use crate::db::paths;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// System-wide configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mirrorctl/mirrorctl.toml";

/// Environment variable naming an alternative configuration file
pub const CONFIG_ENV_VAR: &str = "MIRRORCTL_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database holding mirrors and local repos
    pub db_path: String,
    /// Directory for per-mirror lock files (default: `<db dir>/locks`)
    pub lock_dir: Option<PathBuf>,
    /// Remote index refresh settings
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: paths::DEFAULT_DB_PATH.to_string(),
            lock_dir: None,
            fetch: FetchConfig::default(),
        }
    }
}

/// HTTP settings for index refreshes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.fetch.max_retries == 0 {
            return Err(Error::Config("fetch.max_retries must be at least 1".to_string()));
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Find and load the configuration file, falling back to defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!("Loading configuration from {}", path.display());
            return Self::load_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            debug!("Loading configuration from ${} = {}", CONFIG_ENV_VAR, path.display());
            return Self::load_file(&path);
        }

        let system = Path::new(DEFAULT_CONFIG_PATH);
        if system.exists() {
            debug!("Loading configuration from {}", system.display());
            return Self::load_file(system);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Directory holding per-mirror lock files
    pub fn lock_dir(&self) -> PathBuf {
        self.lock_dir
            .clone()
            .unwrap_or_else(|| paths::lock_dir(&self.db_path))
    }
}
