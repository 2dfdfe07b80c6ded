//! Hooks
//!
//! State objects owned once per pool / per session, each driven through an
//! explicit interface. The state lives in a `StateCell` so the web app can
//! keep it in a reactive signal while tests keep it in a `RefCell`.

mod cell;
mod prompt;
mod inventory;
mod auth;

#[cfg(test)]
mod tests;

pub use cell::StateCell;
pub use prompt::{ConfirmPrompt, Confirmed, CredentialField, CredentialPrompt};
pub use inventory::{DeleteOutcome, InventoryHook, LoadStatus, PoolState, SaveOutcome};
pub use auth::{AuthHook, AuthState, ADMIN_ROLE};
