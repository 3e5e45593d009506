//! Configuration loading for lastseen hosts.
//!
//! The configuration lives in `lastseen-config.yaml` next to the host
//! binary's working directory. Every field has a default, so an absent file
//! or an empty document is a valid configuration.
//!
//! ```yaml
//! storage:
//!   departures_path: lastseen-departures.json
//! messages:
//!   path: config/lastseen/messages.json
//! logging:
//!   level: info
//!   format: pretty
//! ```

use std::path::{Path, PathBuf};

use lastseen_store::DEFAULT_DEPARTURES_PATH;
use serde::Deserialize;

use crate::messages::DEFAULT_MESSAGES_PATH;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "lastseen-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LastseenConfig {
    /// Where departures are persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Where message templates are loaded from.
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LastseenConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `LASTSEEN_DEPARTURES_PATH` overrides `storage.departures_path`
    /// - `LASTSEEN_MESSAGES_PATH` overrides `messages.path`
    /// - `LASTSEEN_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string and apply environment
    /// overrides.
    ///
    /// An empty or whitespace-only string yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply `LASTSEEN_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LASTSEEN_DEPARTURES_PATH") {
            self.storage.departures_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LASTSEEN_MESSAGES_PATH") {
            self.messages.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LASTSEEN_LOG_LEVEL") {
            self.logging.level = val;
        }
    }
}

/// Departure store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the departure store file.
    #[serde(default = "default_departures_path")]
    pub departures_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            departures_path: default_departures_path(),
        }
    }
}

/// Message template settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessagesConfig {
    /// Path of the JSON template file.
    #[serde(default = "default_messages_path")]
    pub path: PathBuf,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            path: default_messages_path(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error), used when
    /// `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_departures_path() -> PathBuf {
    PathBuf::from(DEFAULT_DEPARTURES_PATH)
}

fn default_messages_path() -> PathBuf {
    PathBuf::from(DEFAULT_MESSAGES_PATH)
}

fn default_log_level() -> String {
    "info".to_owned()
}
