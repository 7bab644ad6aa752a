//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe where the database lives and how logging is set up.
//! - Load those settings from `TRACKBOT_*` environment variables.
//!
//! # Invariants
//! - Every field has a default; an empty environment yields
//!   [`StoreConfig::default`].

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DATABASE_PATH_ENV: &str = "TRACKBOT_DATABASE_PATH";
pub const BUSY_TIMEOUT_MS_ENV: &str = "TRACKBOT_BUSY_TIMEOUT_MS";
pub const LOG_LEVEL_ENV: &str = "TRACKBOT_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TRACKBOT_LOG_DIR";

const DEFAULT_DATABASE_PATH: &str = "trackbot.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid value for {key}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Logging settings consumed by [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rotating log files; stderr when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

/// Settings for opening a store session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub logging: LoggingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            logging: LoggingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Reads settings from the process environment, falling back to defaults
    /// for unset or empty variables.
    ///
    /// # Errors
    /// - Returns an error when `TRACKBOT_BUSY_TIMEOUT_MS` is not an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_path = non_empty_env(DATABASE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let busy_timeout_ms = match non_empty_env(BUSY_TIMEOUT_MS_ENV) {
            Some(value) => value
                .parse::<u64>()
                .map_err(|err| ConfigError::InvalidValue {
                    key: BUSY_TIMEOUT_MS_ENV,
                    message: format!("`{value}`: {err}"),
                })?,
            None => defaults.busy_timeout_ms,
        };

        let logging = LoggingConfig {
            level: non_empty_env(LOG_LEVEL_ENV).unwrap_or(defaults.logging.level),
            log_dir: non_empty_env(LOG_DIR_ENV).map(PathBuf::from),
        };

        Ok(Self {
            database_path,
            busy_timeout_ms,
            logging,
        })
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    let value = envmnt::get_or(key, "");
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
