//! Backend Layer
//!
//! Remote data and auth abstractions and their implementations.

mod error;
mod traits;
mod session;
mod memory;
mod supabase;

pub use error::{BackendError, BackendResult};
pub use traits::{AuthBackend, InventoryBackend, RemoteClient};
pub use session::{Credentials, Session, SessionStore, SessionUser};
pub use memory::{BackendOp, MemoryBackend};
pub use supabase::SupabaseClient;
