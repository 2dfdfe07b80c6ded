//! Backend Layer - Core Traits
//!
//! Abstract interfaces for the hosted backend.
//! Implementations: the Supabase HTTP client and an in-memory store.
//!
//! Futures are not required to be `Send`: every call is driven from the
//! single UI event loop. The backend objects themselves are `Send + Sync`
//! so reactive closures may hold them.

use async_trait::async_trait;

use super::error::BackendResult;
use super::session::{Credentials, SessionUser};
use crate::domain::{InventoryItem, ItemChanges, ItemId, NewItem, Pool};

/// Table-scoped CRUD over one pool's records
#[async_trait(?Send)]
pub trait InventoryBackend: Send + Sync {
    /// All records of a pool, ordered by gpu ascending
    async fn list(&self, pool: Pool) -> BackendResult<Vec<InventoryItem>>;

    /// Insert a record and return it with its generated id
    async fn insert(&self, pool: Pool, item: &NewItem) -> BackendResult<InventoryItem>;

    /// Apply changes to the record with the given id
    async fn update(&self, pool: Pool, id: &ItemId, changes: &ItemChanges) -> BackendResult<()>;

    /// Delete the record with the given id
    async fn delete(&self, pool: Pool, id: &ItemId) -> BackendResult<()>;
}

/// Session and role primitives
#[async_trait(?Send)]
pub trait AuthBackend: Send + Sync {
    /// Principal of the current session, if any
    async fn current_user(&self) -> BackendResult<Option<SessionUser>>;

    /// Password sign-in; replaces the current session on success
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<SessionUser>;

    /// End the current session
    async fn sign_out(&self) -> BackendResult<()>;

    /// Role recorded for an email in the role table
    async fn role_for(&self, email: &str) -> BackendResult<Option<String>>;
}

/// Full remote client: data plus auth
pub trait RemoteClient: InventoryBackend + AuthBackend {}

impl<T: InventoryBackend + AuthBackend> RemoteClient for T {}
