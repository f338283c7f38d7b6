//! Environment-driven configuration for catalog callers.
//!
//! # Responsibility
//! - Resolve database and logging settings from process environment.
//! - Normalize values once so downstream code sees canonical forms.
//!
//! # Invariants
//! - `database_uri` is never empty.
//! - `log_level` is one of trace|debug|info|warn|error.

use crate::logging::{default_log_level, init_logging, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_URI_VAR: &str = "DATABASE_URI";
pub const LOG_LEVEL_VAR: &str = "CATALOG_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CATALOG_LOG_DIR";
pub const DEFAULT_DATABASE_URI: &str = "sqlite::memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { var: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { var, reason } => write!(f, "invalid `{var}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub database_uri: String,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_uri: DEFAULT_DATABASE_URI.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(uri) = read(DATABASE_URI_VAR) {
            config.database_uri = uri;
        }
        if let Some(level) = read(LOG_LEVEL_VAR) {
            config.log_level = normalize_level(&level).map_err(|reason| {
                ConfigError::InvalidValue {
                    var: LOG_LEVEL_VAR,
                    reason,
                }
            })?;
        }
        config.log_dir = read(LOG_DIR_VAR).map(PathBuf::from);
        Ok(config)
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when logging stays disabled.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))?;
        init_logging(self.log_level, log_dir)?;
        Ok(true)
    }
}
