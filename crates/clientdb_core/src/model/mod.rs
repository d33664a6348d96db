//! Domain model for the client store.
//!
//! # Responsibility
//! - Define the canonical `Client` record used by core business logic.
//!
//! # Invariants
//! - Every persisted client is identified by a storage-assigned `ClientId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod client;
