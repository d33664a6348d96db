//! Client use-case service.
//!
//! # Responsibility
//! - Provide stable select/insert/delete entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Repository errors are returned unchanged.

use crate::model::client::{Client, ClientId};
use crate::repo::client_repo::{ClientListQuery, ClientRepository, RepoResult};

/// Use-case service wrapper for client data access.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds a client from raw field input and persists it.
    ///
    /// # Contract
    /// - Field values are trimmed before validation.
    /// - Returns the storage-assigned id.
    pub fn register_client(
        &self,
        fio: &str,
        login: &str,
        birthday: &str,
        email: &str,
    ) -> RepoResult<ClientId> {
        let client = Client::new(fio.trim(), login.trim(), birthday.trim(), email.trim());
        self.repo.insert_client(&client)
    }

    pub fn insert_client(&self, client: &Client) -> RepoResult<ClientId> {
        self.repo.insert_client(client)
    }

    pub fn select_client(&self, id: ClientId) -> RepoResult<Client> {
        self.repo.select_client(id)
    }

    /// Deletes a client; absent ids succeed without effect.
    pub fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        self.repo.delete_client(id)
    }

    pub fn list_clients(&self, query: &ClientListQuery) -> RepoResult<Vec<Client>> {
        self.repo.list_clients(query)
    }

    /// Returns whether a client row exists.
    ///
    /// `NotFound` maps to `false`; every other error is propagated.
    pub fn client_exists(&self, id: ClientId) -> RepoResult<bool> {
        match self.repo.select_client(id) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
