//! In-Memory Backend
//!
//! A `RemoteClient` held entirely in process memory. Records every call
//! and can be told to fail specific operations; the hook tests run
//! against it.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::error::{BackendError, BackendResult};
use super::session::{Credentials, SessionUser};
use super::traits::{AuthBackend, InventoryBackend};
use crate::domain::{InventoryItem, ItemChanges, ItemId, NewItem, Pool};

/// Remote operations, as recorded and as failure targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    List,
    Insert,
    Update,
    Delete,
    CurrentUser,
    SignIn,
    SignOut,
    RoleLookup,
}

struct Account {
    user_id: String,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<Pool, Vec<InventoryItem>>,
    accounts: HashMap<String, Account>,
    roles: HashMap<String, String>,
    session: Option<SessionUser>,
    next_id: u64,
    calls: Vec<BackendOp>,
    failing: HashSet<BackendOp>,
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pool's table
    pub fn with_items(self, pool: Pool, items: Vec<InventoryItem>) -> Self {
        self.lock().tables.insert(pool, items);
        self
    }

    /// Register an account, optionally with a role row
    pub fn with_account(self, email: &str, password: &str, role: Option<&str>) -> Self {
        {
            let mut state = self.lock();
            let user_id = format!("user-{}", state.accounts.len() + 1);
            state.accounts.insert(
                email.to_string(),
                Account {
                    user_id,
                    password: password.to_string(),
                },
            );
            if let Some(role) = role {
                state.roles.insert(email.to_string(), role.to_string());
            }
        }
        self
    }

    /// Start with `email` already signed in
    pub fn with_session(self, email: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state
                .accounts
                .get(email)
                .map(|account| account.user_id.clone())
                .unwrap_or_else(|| format!("user-{email}"));
            state.session = Some(SessionUser {
                id,
                email: Some(email.to_string()),
            });
        }
        self
    }

    /// Make every future call of `op` fail
    pub fn fail(&self, op: BackendOp) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: BackendOp) {
        self.lock().failing.remove(&op);
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<BackendOp> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: BackendOp) -> usize {
        self.lock().calls.iter().filter(|call| **call == op).count()
    }

    /// Current contents of a pool's table
    pub fn items(&self, pool: Pool) -> Vec<InventoryItem> {
        self.lock().tables.get(&pool).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and return the state, or the injected failure
    fn begin(&self, op: BackendOp) -> BackendResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.failing.contains(&op) {
            return Err(BackendError::Transport(format!("injected failure for {op:?}")));
        }
        Ok(state)
    }
}

#[async_trait(?Send)]
impl InventoryBackend for MemoryBackend {
    async fn list(&self, pool: Pool) -> BackendResult<Vec<InventoryItem>> {
        let state = self.begin(BackendOp::List)?;
        let mut items = state.tables.get(&pool).cloned().unwrap_or_default();
        items.sort_by(|a, b| a.gpu.cmp(&b.gpu));
        Ok(items)
    }

    async fn insert(&self, pool: Pool, item: &NewItem) -> BackendResult<InventoryItem> {
        let mut state = self.begin(BackendOp::Insert)?;
        state.next_id += 1;
        let created = item.clone().with_id(ItemId::new(format!("{}-{}", pool, state.next_id)));
        state.tables.entry(pool).or_default().push(created.clone());
        Ok(created)
    }

    async fn update(&self, pool: Pool, id: &ItemId, changes: &ItemChanges) -> BackendResult<()> {
        let mut state = self.begin(BackendOp::Update)?;
        let record = state
            .tables
            .get_mut(&pool)
            .and_then(|items| items.iter_mut().find(|item| &item.id == id))
            .ok_or_else(|| BackendError::NotFound(format!("{} record {}", pool, id)))?;
        changes.apply_to(record);
        Ok(())
    }

    async fn delete(&self, pool: Pool, id: &ItemId) -> BackendResult<()> {
        let mut state = self.begin(BackendOp::Delete)?;
        let items = state.tables.entry(pool).or_default();
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(BackendError::NotFound(format!("{} record {}", pool, id)));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl AuthBackend for MemoryBackend {
    async fn current_user(&self) -> BackendResult<Option<SessionUser>> {
        let state = self.begin(BackendOp::CurrentUser)?;
        Ok(state.session.clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<SessionUser> {
        let mut state = self.begin(BackendOp::SignIn)?;
        let user_id = match state.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => account.user_id.clone(),
            _ => return Err(BackendError::Unauthorized("Invalid login credentials".to_string())),
        };
        let user = SessionUser {
            id: user_id,
            email: Some(credentials.email.clone()),
        };
        state.session = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let mut state = self.lock();
        state.calls.push(BackendOp::SignOut);
        state.session = None;
        if state.failing.contains(&BackendOp::SignOut) {
            return Err(BackendError::Transport("injected failure for SignOut".to_string()));
        }
        Ok(())
    }

    async fn role_for(&self, email: &str) -> BackendResult<Option<String>> {
        let state = self.begin(BackendOp::RoleLookup)?;
        Ok(state.roles.get(email).cloned())
    }
}
