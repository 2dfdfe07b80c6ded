//! Application Context
//!
//! Hook handles shared through the Leptos Context API. Each pool and the
//! session keep their state in a signal; views read the signal, event
//! handlers build a hook over it and call its operations.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use inventory_core::{AuthHook, AuthState, InventoryHook, Pool, PoolState, RemoteClient, StateCell};
use rolling_logger::LogBuffer;

/// `StateCell` over a Leptos signal. Hooks read untracked and write
/// through the signal so views re-render.
pub struct SignalCell<T: 'static>(RwSignal<T>);

impl<T: 'static> Clone for SignalCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SignalCell<T> {}

impl<T: Send + Sync + 'static> SignalCell<T> {
    pub fn new(value: T) -> Self {
        Self(RwSignal::new(value))
    }

    /// The signal itself, for tracked reads in views
    pub fn signal(&self) -> RwSignal<T> {
        self.0
    }
}

impl<T: Send + Sync + 'static> StateCell<T> for SignalCell<T> {
    fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn update_state<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut state = self.0.write();
        f(&mut state)
    }
}

pub type PoolHook = InventoryHook<SignalCell<PoolState>, dyn RemoteClient>;
pub type SessionHook = AuthHook<SignalCell<AuthState>, dyn RemoteClient>;

/// App-wide hook state provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    backend: StoredValue<Arc<dyn RemoteClient>>,
    global: SignalCell<PoolState>,
    internal: SignalCell<PoolState>,
    auth: SignalCell<AuthState>,
    logs: StoredValue<LogBuffer>,
}

impl AppContext {
    pub fn new(backend: Arc<dyn RemoteClient>, logs: LogBuffer) -> Self {
        Self {
            backend: StoredValue::new(backend),
            global: SignalCell::new(PoolState::new(Pool::Global)),
            internal: SignalCell::new(PoolState::new(Pool::Internal)),
            auth: SignalCell::new(AuthState::new()),
            logs: StoredValue::new(logs),
        }
    }

    pub fn pool_state(&self, pool: Pool) -> RwSignal<PoolState> {
        self.pool_cell(pool).signal()
    }

    fn pool_cell(&self, pool: Pool) -> SignalCell<PoolState> {
        match pool {
            Pool::Global => self.global,
            Pool::Internal => self.internal,
        }
    }

    /// Hook over one pool's state
    pub fn inventory(&self, pool: Pool) -> PoolHook {
        InventoryHook::new(self.pool_cell(pool), self.backend.get_value())
    }

    /// Re-fetch every pool that was already loaded, under the current session
    pub fn reload_loaded_pools(&self) {
        for pool in Pool::ALL {
            let hook = self.inventory(pool);
            spawn_local(async move {
                let _ = hook.reload_if_loaded().await;
            });
        }
    }

    pub fn auth_state(&self) -> RwSignal<AuthState> {
        self.auth.signal()
    }

    pub fn auth(&self) -> SessionHook {
        AuthHook::new(self.auth, self.backend.get_value())
    }

    /// Tracked: whether the add row and row actions are shown
    pub fn can_manage(&self) -> bool {
        self.auth.signal().with(AuthState::can_manage)
    }

    pub fn logs(&self) -> LogBuffer {
        self.logs.get_value()
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
