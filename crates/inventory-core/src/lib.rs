//! GPU Inventory Core
//!
//! Layered architecture:
//! - domain: inventory records, pools, edit state, filtering and stats
//! - backend: remote data/auth client abstractions and implementations
//! - hooks: per-pool and per-session state objects driving the views
//! - config: hosted backend configuration

pub mod backend;
pub mod config;
pub mod domain;
pub mod hooks;

pub use backend::{
    AuthBackend, BackendError, BackendOp, BackendResult, Credentials, InventoryBackend, MemoryBackend,
    RemoteClient, Session, SessionStore, SessionUser, SupabaseClient,
};
pub use config::{BackendConfig, ConfigError};
pub use domain::{
    filter_items, DomainError, DomainResult, EditState, InventoryItem, InventoryStats, ItemChanges,
    ItemDraft, ItemField, ItemFields, ItemId, ItemStatus, NewItem, Pool,
};
pub use hooks::{
    AuthHook, AuthState, ConfirmPrompt, Confirmed, CredentialField, CredentialPrompt,
    DeleteOutcome, InventoryHook, LoadStatus, PoolState, SaveOutcome, StateCell, ADMIN_ROLE,
};
