//! Application configuration management.
//!
//! Configuration is stored at `~/.config/fplhub/config.json` (platform
//! equivalent via `dirs`). Every field has a default, so a missing file or a
//! partial one is fine. The cache and season data locations can also be set
//! through `FPLHUB_CACHE_DIR` and `FPLHUB_DATA_DIR`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::API_BASE_URL;
use crate::api::retry::{RetryPolicy, INITIAL_BACKOFF_MS, MAX_ATTEMPTS};
use crate::api::transport::REQUEST_TIMEOUT_SECS;
use crate::cache::DEFAULT_TTL;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "fplhub";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment override for the cache directory
pub const CACHE_DIR_ENV: &str = "FPLHUB_CACHE_DIR";

/// Environment override for the season data directory
pub const DATA_DIR_ENV: &str = "FPLHUB_DATA_DIR";

/// Season CSV directory used when nothing else is configured
const DEFAULT_SEASON_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub cache_dir: Option<PathBuf>,
    pub season_data_dir: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub use_cache: bool,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            cache_dir: None,
            season_data_dir: None,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            use_cache: true,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            max_attempts: MAX_ATTEMPTS,
            initial_backoff_ms: INITIAL_BACKOFF_MS,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache directory: environment, then config file, then the platform
    /// cache directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = env_path(CACHE_DIR_ENV) {
            return Ok(dir);
        }
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Season data directory: environment, then config file, then `./data`.
    pub fn season_data_dir(&self) -> PathBuf {
        env_path(DATA_DIR_ENV)
            .or_else(|| self.season_data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SEASON_DATA_DIR))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
        }
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
