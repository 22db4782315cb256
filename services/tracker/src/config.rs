//! services/tracker/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding the users, session and documents JSON files.
    pub data_dir: PathBuf,
    pub log_level: Level,
    /// Artificial wait before login and registration complete.
    pub simulated_latency: Duration,
    /// Author recorded on versions when neither the form nor the session names one.
    pub default_author: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./tracker-data"),
            log_level: Level::INFO,
            simulated_latency: Duration::from_millis(1000),
            default_author: "User".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("TRACKER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let log_level = match lookup("RUST_LOG") {
            Some(raw) => raw.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", raw),
                )
            })?,
            None => defaults.log_level,
        };

        let simulated_latency = match lookup("TRACKER_SIMULATED_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| {
                    ConfigError::InvalidValue("TRACKER_SIMULATED_LATENCY_MS".to_string(), e.to_string())
                })?,
            None => defaults.simulated_latency,
        };

        let default_author = match lookup("TRACKER_DEFAULT_AUTHOR") {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "TRACKER_DEFAULT_AUTHOR".to_string(),
                    "must not be blank".to_string(),
                ))
            }
            Some(raw) => raw,
            None => defaults.default_author,
        };

        Ok(Self {
            data_dir,
            log_level,
            simulated_latency,
            default_author,
        })
    }
}
