//! Domain Layer
//!
//! Inventory entities and the pure rules over them.
//! Nothing here talks to the network.

mod error;
mod item;
mod pool;
mod edit;
mod stats;

pub use error::{DomainError, DomainResult};
pub use item::{InventoryItem, ItemChanges, ItemDraft, ItemField, ItemFields, ItemId, ItemStatus, NewItem};
pub use pool::Pool;
pub use edit::EditState;
pub use stats::{filter_items, InventoryStats};
