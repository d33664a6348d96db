//! Client repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide select/insert/delete APIs over the `clients` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Each operation is a single parameterized statement.
//! - A lookup miss is always `RepoError::NotFound`, never a driver error.
//! - Driver errors are wrapped unchanged in `RepoError::Db`.
//! - Deleting an absent id is a successful no-op.
//! - Reads return stored rows as-is; only NULL or mistyped columns fail.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::client::{Client, ClientId, ClientValidationError};
use log::{debug, error};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    fio,
    login,
    birthday,
    email
FROM clients";

const CLIENT_COLUMNS: [&str; 5] = ["id", "fio", "login", "birthday", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    Db(DbError),
    /// No row exists for the requested id.
    NotFound(ClientId),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error is the lookup-miss sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination options for listing clients in `id` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for client data access.
pub trait ClientRepository {
    /// Persists a new client and returns the storage-assigned id.
    fn insert_client(&self, client: &Client) -> RepoResult<ClientId>;
    /// Loads one client; `NotFound` when no row matches.
    fn select_client(&self, id: ClientId) -> RepoResult<Client>;
    /// Removes at most one client row.
    fn delete_client(&self, id: ClientId) -> RepoResult<()>;
    fn list_clients(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>>;
}

/// SQLite-backed client repository borrowing a session connection.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_client_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn insert_client(&self, client: &Client) -> RepoResult<ClientId> {
        client.validate()?;

        if let Err(err) = self.conn.execute(
            "INSERT INTO clients (fio, login, birthday, email)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                client.fio.as_str(),
                client.login.as_str(),
                client.birthday.as_str(),
                client.email.as_str(),
            ],
        ) {
            let err = DbError::from(err);
            error!(
                "event=client_insert module=repo status=error error_code={} error={err}",
                err.log_code()
            );
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        debug!("event=client_insert module=repo status=ok client_id={id}");
        Ok(id)
    }

    fn select_client(&self, id: ClientId) -> RepoResult<Client> {
        let client = self
            .conn
            .query_row(
                &format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                read_client_row,
            )
            .optional()?;

        match client {
            Some(client) => {
                debug!("event=client_select module=repo status=ok client_id={id}");
                Ok(client)
            }
            None => {
                debug!("event=client_select module=repo status=not_found client_id={id}");
                Err(RepoError::NotFound(id))
            }
        }
    }

    fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])?;

        debug!("event=client_delete module=repo status=ok client_id={id} changed={changed}");
        Ok(())
    }

    fn list_clients(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        let mut sql = format!("{CLIENT_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        match (query.limit, query.offset) {
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
                bind_values.push(Value::Integer(i64::from(offset)));
            }
            (None, 0) => {}
            (None, offset) => {
                // Why: SQLite only accepts OFFSET after LIMIT; -1 means unbounded.
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(i64::from(offset)));
            }
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut clients = Vec::new();

        while let Some(row) = rows.next()? {
            clients.push(read_client_row(row)?);
        }

        Ok(clients)
    }
}

fn read_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        fio: row.get("fio")?,
        login: row.get("login")?,
        birthday: row.get("birthday")?,
        email: row.get("email")?,
    })
}

fn ensure_client_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "clients")? {
        return Err(RepoError::MissingRequiredTable("clients"));
    }

    for column in CLIENT_COLUMNS {
        if !table_has_column(conn, "clients", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "clients",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
