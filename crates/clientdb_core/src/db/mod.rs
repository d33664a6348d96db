//! SQLite session bootstrap for the client store.
//!
//! # Responsibility
//! - Hand out one migrated `rusqlite::Connection` per session.
//! - Classify driver failures for logging without altering them.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - `clients` is never touched before migrations succeed.
//! - `DbError::Sqlite` carries the driver error unmodified.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer failure surfaced by open, migration and client queries.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File carries a schema version this build does not know.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// SQLite primary result code, when the failure came from the engine.
    pub fn sqlite_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(failure, _)) => Some(failure.code),
            _ => None,
        }
    }

    /// Whether a `CHECK`/`NOT NULL`/`UNIQUE` rule rejected the statement.
    pub fn is_constraint_violation(&self) -> bool {
        self.sqlite_code() == Some(ErrorCode::ConstraintViolation)
    }

    /// Stable `error_code=` token for structured log lines.
    pub fn log_code(&self) -> &'static str {
        match self {
            Self::UnsupportedSchemaVersion { .. } => "schema_too_new",
            _ if self.is_constraint_violation() => "constraint_violation",
            _ => "storage_failure",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "client store schema v{db_version} requires a newer build (this build knows up to v{latest_supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
