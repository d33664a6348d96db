//! Core data access for the client store.
//! This crate owns the `clients` schema and its access rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{Config, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::client::{Client, ClientId, ClientValidationError};
pub use repo::client_repo::{
    ClientListQuery, ClientRepository, RepoError, RepoResult, SqliteClientRepository,
};
pub use service::client_service::ClientService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
