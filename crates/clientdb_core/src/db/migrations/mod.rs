//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register `clients` schema migrations in strictly increasing order.
//! - Apply pending migrations in one transaction.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Scripts use `IF NOT EXISTS` so pre-existing fixture files with an
//!   unversioned `clients` table migrate cleanly.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "clients",
        sql: include_str!("0001_clients.sql"),
    },
    Migration {
        version: 2,
        name: "clients_login_index",
        sql: include_str!("0002_clients_login_index.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version currently recorded in the database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies all pending migrations on the provided connection.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Sqlite` when any script fails; the transaction is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    if from_version == latest {
        debug!("event=db_migrate module=db status=skip version={from_version}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        debug!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}
