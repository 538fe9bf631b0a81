//! # Client Configuration
//!
//! Where the backend lives, how long to wait for it, and the report sizes.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SWIFTLANE_API_URL=http://10.0.0.5:5001                             │
//! │     SWIFTLANE_API_TIMEOUT_SECS=5                                       │
//! │     SWIFTLANE_LEADERBOARD_SIZE=10                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $SWIFTLANE_CONFIG, or                                              │
//! │     ~/.config/swiftlane/client.toml (Linux)                            │
//! │     ~/Library/Application Support/com.swiftlane.swiftlane/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:5001, 10 s timeout, top 5                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "http://localhost:5001"
//! timeout_secs = 10
//!
//! [reports]
//! leaderboard_size = 5
//! recent_limit = 5
//! profile_history = 10
//!
//! [fare]
//! base_rate = 50.0
//! per_km_rate = 12.0
//! min_distance_km = 2.0
//! max_distance_km = 17.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use swiftlane_core::{
    FareSchedule, DEFAULT_LEADERBOARD_SIZE, DEFAULT_PROFILE_HISTORY, DEFAULT_RECENT_LIMIT,
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SWIFTLANE_CONFIG";

// =============================================================================
// Config Error
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Backend URL is not an absolute http(s) URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    /// Values parse but are inconsistent.
    #[error("{0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

// =============================================================================
// Settings Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend root, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Report sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Entries per leaderboard.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,

    /// Rides/orders on the dashboard.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Rides/orders on a profile.
    #[serde(default = "default_profile_history")]
    pub profile_history: usize,
}

fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_profile_history() -> usize {
    DEFAULT_PROFILE_HISTORY
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            leaderboard_size: default_leaderboard_size(),
            recent_limit: default_recent_limit(),
            profile_history: default_profile_history(),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub reports: ReportSettings,

    #[serde(default)]
    pub fare: FareSchedule,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$SWIFTLANE_CONFIG`, or the platform path)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading client config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SWIFTLANE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(value) = lookup("SWIFTLANE_API_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_env("SWIFTLANE_API_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = lookup("SWIFTLANE_LEADERBOARD_SIZE") {
            self.reports.leaderboard_size = parse_env("SWIFTLANE_LEADERBOARD_SIZE", &value)?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }

        self.fare
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// The backend root as a parsed URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api.base_url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "swiftlane", "swiftlane")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
