//! Application configuration management.
//!
//! Configuration names the API root plus the school slug and location the
//! menu is shown for. It is read from `~/.config/dinecache/config.json` when
//! that file exists, then overridden by `DINECACHE_*` environment variables.
//! Nothing is ever written back.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_ROOT, DEFAULT_TIMEOUT_SECS};

/// Application name used for the config directory path
const APP_NAME: &str = "dinecache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_ROOT: &str = "DINECACHE_API_ROOT";
pub const ENV_SCHOOL: &str = "DINECACHE_SCHOOL";
pub const ENV_LOCATION: &str = "DINECACHE_LOCATION";
pub const ENV_TIMEOUT_SECS: &str = "DINECACHE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_root: String,
    pub school_slug: String,
    pub location_name: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            school_slug: "acadiau".to_string(),
            location_name: "Wheelock Dining Hall".to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_json(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config file")
    }

    /// Override fields from environment-style lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = get(ENV_API_ROOT) {
            self.api_root = root;
        }
        if let Some(school) = get(ENV_SCHOOL) {
            self.school_slug = school;
        }
        if let Some(location) = get(ENV_LOCATION) {
            self.location_name = location;
        }
        if let Some(timeout) = get(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT_SECS, timeout))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
