//! Configuration for the data layer.
//!
//! Stored as JSON at `~/.config/usercache/config.json`. Every field has a
//! default, so a missing file or a partial one is fine.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::layer::Settings;
use crate::retry::RetryPolicy;

/// Application name used for the config directory
const APP_NAME: &str = "usercache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub default_ttl_secs: u64,
    pub stats_ttl_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub batch_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_ttl_secs: settings.default_ttl.as_secs(),
            stats_ttl_secs: settings.stats_ttl.as_secs(),
            max_retries: settings.retry.max_retries,
            retry_base_delay_ms: settings.retry.base_delay.as_millis() as u64,
            batch_delay_ms: settings.batch_delay.as_millis() as u64,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            default_ttl: Duration::from_secs(self.default_ttl_secs),
            stats_ttl: Duration::from_secs(self.stats_ttl_secs),
            retry: RetryPolicy::new(
                self.max_retries,
                Duration::from_millis(self.retry_base_delay_ms),
            ),
            batch_delay: Duration::from_millis(self.batch_delay_ms),
        }
    }
}
