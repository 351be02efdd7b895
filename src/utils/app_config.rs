/// Application configuration management
/// Stores user preferences in ~/.config/metrics-dash/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::utils::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SPINNER_INTERVAL_MS, MIN_SPINNER_INTERVAL_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the metrics service; `/json` is appended when missing
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub spinner_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            spinner_interval_ms: DEFAULT_SPINNER_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// Directory holding the config file and default log file
    pub fn config_dir() -> Result<PathBuf> {
        let base = match dirs::config_dir() {
            Some(dir) => dir,
            None => {
                let home = std::env::var("HOME").context("HOME environment variable not set")?;
                PathBuf::from(home).join(".config")
            }
        };
        let config_dir = base.join(APP_DIR_NAME);

        // Create directory if it doesn't exist
        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&contents).context("Failed to parse config file")?;

        debug!(path = %path.display(), endpoint = %config.endpoint, "Loaded config");
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Apply command-line (or environment) overrides
    pub fn with_overrides(mut self, endpoint: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = timeout_secs {
            self.request_timeout_secs = timeout;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Spinner period; a zero period would make the interval task panic
    pub fn spinner_interval(&self) -> Duration {
        Duration::from_millis(self.spinner_interval_ms.max(MIN_SPINNER_INTERVAL_MS))
    }

    /// Return a list of human-readable problems, empty when valid
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            errors.push("endpoint must not be empty".to_string());
        } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!("endpoint must start with http:// or https:// (got '{}')", endpoint));
        }

        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be greater than 0".to_string());
        }

        if self.spinner_interval_ms < MIN_SPINNER_INTERVAL_MS {
            errors.push(format!(
                "spinner_interval_ms must be at least {}",
                MIN_SPINNER_INTERVAL_MS
            ));
        }

        errors
    }
}
