//! Runtime configuration for opening the client store.
//!
//! # Responsibility
//! - Load settings from `CLIENTDB_*` environment variables and `.env`.
//! - Supply defaults so a bare invocation opens `demo.db`.
//!
//! # Invariants
//! - The database path is the only storage configuration point.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "CLIENTDB_";
pub const DEFAULT_DATABASE_PATH: &str = "demo.db";

/// Settings for one client store session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// SQLite database file (`CLIENTDB_DATABASE_PATH`).
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// `CLIENTDB_LOG_LEVEL`.
    #[serde(default = "default_level")]
    pub log_level: String,
    /// Rolling log directory; logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_level(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(envy::Error);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {ENV_PREFIX}* configuration: {}", self.0)
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl Config {
    /// Loads `.env` if present, then reads `CLIENTDB_*` process variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        envy::prefixed(ENV_PREFIX).from_env().map_err(ConfigError)
    }

    /// Reads configuration from explicit `(key, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(ConfigError)
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_level() -> String {
    default_log_level().to_string()
}
