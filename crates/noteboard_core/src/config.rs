//! Session configuration.
//!
//! # Responsibility
//! - Carry the tunables of one editor session (poll cadence, logging, storage).
//! - Normalize raw values into the ranges the core accepts.
//!
//! # Invariants
//! - `poll_interval()` is always within `[MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS]`.
//! - A zero or missing interval falls back to the 300 ms default.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 300;
pub const MIN_POLL_INTERVAL_MS: u64 = 10;
pub const MAX_POLL_INTERVAL_MS: u64 = 10_000;

/// Tunables for one editor session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Selection watcher cadence in milliseconds.
    pub poll_interval_ms: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Note database file; an in-memory database is used when unset.
    pub db_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
            db_path: None,
        }
    }
}

impl SessionConfig {
    /// Effective watcher cadence after normalization.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(normalize_poll_interval_ms(Some(self.poll_interval_ms)))
    }

    /// Validates the textual settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_log_level(&self.log_level)?;
        if let Some(dir) = self.log_dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(dir) => {
                write!(f, "log_dir must be an absolute path, got `{}`", dir.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Clamps the poll interval into the supported range.
pub fn normalize_poll_interval_ms(value: Option<u64>) -> u64 {
    match value {
        None | Some(0) => DEFAULT_POLL_INTERVAL_MS,
        Some(ms) => ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS),
    }
}

/// Maps user input to a canonical log level.
pub fn normalize_log_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
