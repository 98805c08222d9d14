use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/giftlink/config.toml` on Unix/macOS, or the
    /// equivalent elsewhere via `dirs::config_dir()`. Falls back to the
    /// current directory if the config dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("giftlink").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Config::default());
        }

        Self::load_from(&path)
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The link origin is non-empty and has a scheme
    /// - The daily cap and recent cap are at least 1
    /// - The cooldown interval is not negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.origin.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "link.origin must not be empty".to_string(),
            });
        }

        if !self.link.origin.contains("://") {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "link.origin '{}' must include a scheme (e.g. https://)",
                    self.link.origin
                ),
            });
        }

        if self.limits.daily_cap == 0 {
            return Err(ConfigError::ValidationError {
                message: "limits.daily_cap must be at least 1".to_string(),
            });
        }

        if self.limits.recent_cap == 0 {
            return Err(ConfigError::ValidationError {
                message: "limits.recent_cap must be at least 1".to_string(),
            });
        }

        if self.limits.min_interval_ms < 0 {
            return Err(ConfigError::ValidationError {
                message: "limits.min_interval_ms must not be negative".to_string(),
            });
        }

        Ok(())
    }
}
