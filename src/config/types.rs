use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub shortener: ShortenerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Share-link assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Origin prepended to every share link (scheme + host).
    #[serde(default = "default_origin")]
    pub origin: String,
}

/// Shortening-service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenerConfig {
    /// GET endpoint of the shortening service.
    #[serde(default = "default_shortener_endpoint")]
    pub endpoint: String,
    /// Disable to always hand out the long URL.
    #[serde(default = "default_shortener_enabled")]
    pub enabled: bool,
}

/// Creation rate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Minimum milliseconds between creations (default: 5000).
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: i64,
    /// Maximum creations per calendar day (default: 10).
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
    /// Entries kept in the recent list (default: 5).
    #[serde(default = "default_recent_cap")]
    pub recent_cap: usize,
}

/// Persistence location override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted records; platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_origin() -> String {
    "https://giftlink.app".to_string()
}

fn default_shortener_endpoint() -> String {
    "https://is.gd/create.php".to_string()
}

fn default_shortener_enabled() -> bool {
    true
}

fn default_min_interval_ms() -> i64 {
    5_000
}

fn default_daily_cap() -> u32 {
    10
}

fn default_recent_cap() -> usize {
    crate::voucher::store::DEFAULT_RECENT_CAP
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_shortener_endpoint(),
            enabled: default_shortener_enabled(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            daily_cap: default_daily_cap(),
            recent_cap: default_recent_cap(),
        }
    }
}
