//! Configuration loading for salvo.
//!
//! Configuration is read from a TOML file: `--config <path>` if given,
//! otherwise `salvo.toml` in the platform config directory if it exists.
//! Every field has a default, so an empty file or no file at all is valid.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for salvo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Game database settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Polling settings.
    #[serde(default)]
    pub poll: PollConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Game database settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `game_<id>.db` files (default: platform data dir).
    pub data_dir: Option<PathBuf>,
    /// How long to wait for the other process's write lock (default: 5000).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Polling settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Sleep between unchanged snapshot reads (default: 500).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_interval_ms() -> u64 {
    500
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl StoreConfig {
    /// Busy timeout as a duration.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl PollConfig {
    /// Poll interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl LogConfig {
    /// Filter used when `RUST_LOG` is unset. Quiet by default so the boards
    /// stay readable.
    pub fn filter_or_default(&self) -> &str {
        self.filter.as_deref().unwrap_or("warn")
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `explicit` if given, else the default file if present, else
    /// built-in defaults.
    pub fn load(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<Self, ConfigError> {
        match (explicit, default_path) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(path)) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
