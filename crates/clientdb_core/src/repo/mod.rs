//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the client data access contract.
//! - Isolate SQLite query details from service callers.
//!
//! # Invariants
//! - Repository writes must enforce `Client::validate()` before persistence.
//! - Repository APIs return the semantic `NotFound` error separately from
//!   DB transport errors.

pub mod client_repo;
