//! Inventory Hook
//!
//! Owns one pool's cached items, filter and edit state, and runs the
//! add / edit / save / delete operations against the backend. Local state
//! only changes after the backend confirms.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::cell::StateCell;
use super::prompt::ConfirmPrompt;
use crate::backend::InventoryBackend;
use crate::domain::{
    filter_items, DomainError, DomainResult, EditState, InventoryItem, InventoryStats, ItemDraft,
    ItemField, ItemId, Pool,
};

/// Progress of the pool's fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Cached state of one pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolState {
    pool: Pool,
    items: Vec<InventoryItem>,
    filter: String,
    edit: EditState,
    load: LoadStatus,
    /// Last mutation failure, shown as a banner until dismissed
    error: Option<String>,
    /// Bumped whenever `items` changes
    revision: u64,
    /// Bumped per fetch; only the latest fetch may populate `items`
    load_generation: u64,
}

impl PoolState {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            items: Vec::new(),
            filter: String::new(),
            edit: EditState::Viewing,
            load: LoadStatus::Idle,
            error: None,
            revision: 0,
            load_generation: 0,
        }
    }

    pub fn pool(&self) -> Pool {
        self.pool
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadStatus::Idle | LoadStatus::Loading)
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.load {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: &ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Items matching the current filter
    pub fn filtered(&self) -> Vec<&InventoryItem> {
        filter_items(&self.items, &self.filter)
    }

    /// Owned copy of the filtered items, for views
    pub fn filtered_items(&self) -> Vec<InventoryItem> {
        self.filtered().into_iter().cloned().collect()
    }

    /// Stats over the filtered items
    pub fn stats(&self) -> InventoryStats {
        InventoryStats::from_items(self.filtered())
    }

    fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.load = LoadStatus::Loading;
        self.load_generation
    }

    /// Apply a fetch result. Returns false if a newer fetch superseded it.
    fn finish_load(&mut self, generation: u64, result: Result<Vec<InventoryItem>, String>) -> bool {
        if generation != self.load_generation {
            return false;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.revision += 1;
                self.load = LoadStatus::Ready;
                let still_present = self
                    .edit
                    .editing_id()
                    .is_none_or(|id| self.items.iter().any(|item| &item.id == id));
                if !still_present {
                    self.edit = EditState::Viewing;
                }
            }
            Err(message) => self.load = LoadStatus::Failed(message),
        }
        true
    }

    fn items_changed(&mut self) {
        self.revision += 1;
        self.error = None;
    }
}

/// Result of `InventoryHook::save`
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// No row was being edited
    NotEditing,
    /// Scratch matched the record; edit mode closed without a remote call
    Unchanged,
    Saved(InventoryItem),
}

/// Result of `InventoryHook::delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
}

/// Operations over one pool's state
pub struct InventoryHook<S, B: ?Sized> {
    state: S,
    backend: Arc<B>,
}

impl<S: Clone, B: ?Sized> Clone for InventoryHook<S, B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<S, B> InventoryHook<S, B>
where
    S: StateCell<PoolState>,
    B: InventoryBackend + ?Sized,
{
    pub fn new(state: S, backend: Arc<B>) -> Self {
        Self { state, backend }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn pool(&self) -> Pool {
        self.state.with_state(PoolState::pool)
    }

    pub fn set_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.state.update_state(|s| s.filter = filter);
    }

    pub fn dismiss_error(&self) {
        self.state.update_state(|s| s.error = None);
    }

    fn report(&self, err: &DomainError) {
        let message = err.to_string();
        self.state.update_state(|s| s.error = Some(message));
    }

    /// Fetch every record of the pool. Returns the number loaded.
    pub async fn load(&self) -> DomainResult<usize> {
        let pool = self.pool();
        let generation = self.state.update_state(PoolState::begin_load);
        debug!(%pool, generation, "Loading inventory");

        match self.backend.list(pool).await {
            Ok(items) => {
                let count = items.len();
                if self.state.update_state(|s| s.finish_load(generation, Ok(items))) {
                    info!(%pool, count, "Loaded inventory");
                } else {
                    debug!(%pool, generation, "Discarded superseded inventory fetch");
                }
                Ok(count)
            }
            Err(err) => {
                error!(%pool, error = %err, "Error loading inventory");
                let message = err.to_string();
                self.state.update_state(|s| s.finish_load(generation, Err(message)));
                Err(err.into())
            }
        }
    }

    /// Re-fetch a pool that has been loaded before, e.g. after the session
    /// changed. Pools never loaded stay idle and return `None`.
    pub async fn reload_if_loaded(&self) -> DomainResult<Option<usize>> {
        if matches!(self.state.with_state(|s| s.load_status().clone()), LoadStatus::Idle) {
            return Ok(None);
        }
        self.load().await.map(Some)
    }

    /// Validate and insert a new record, appending the stored copy
    pub async fn add(&self, draft: &ItemDraft) -> DomainResult<InventoryItem> {
        let pool = self.pool();
        let new_item = match draft.validate() {
            Ok(new_item) => new_item,
            Err(err) => {
                debug!(%pool, error = %err, "Rejected new item");
                self.report(&err);
                return Err(err);
            }
        };

        match self.backend.insert(pool, &new_item).await {
            Ok(created) => {
                info!(%pool, id = %created.id, gpu = %created.gpu, "Added item");
                self.state.update_state(|s| {
                    s.items.push(created.clone());
                    s.items_changed();
                });
                Ok(created)
            }
            Err(err) => {
                error!(%pool, error = %err, "Error adding item");
                let err = DomainError::from(err);
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Start editing a record.
    ///
    /// Returns the id of a previously edited record whose unsaved changes
    /// were discarded by the switch.
    pub fn edit(&self, id: &ItemId) -> DomainResult<Option<ItemId>> {
        self.state.update_state(|s| {
            let item = s
                .find(id)
                .ok_or_else(|| DomainError::NotFound(format!("item {id}")))?;
            let next = EditState::begin(item);
            let abandoned = match &s.edit {
                EditState::Editing { id: previous, .. } if previous != id && s.edit.has_unsaved_changes() => {
                    Some(previous.clone())
                }
                _ => None,
            };
            s.edit = next;
            Ok(abandoned)
        })
    }

    /// Change one field of the scratch copy
    pub fn update_scratch(&self, field: ItemField, value: impl Into<String>) -> bool {
        let value = value.into();
        self.state.update_state(|s| s.edit.set_field(field, value))
    }

    pub fn cancel_edit(&self) {
        self.state.update_state(|s| s.edit = EditState::Viewing);
    }

    /// Send the edited record's changed columns and merge them locally
    pub async fn save(&self) -> DomainResult<SaveOutcome> {
        let pool = self.pool();
        let pending = self.state.with_state(|s| {
            s.edit
                .pending_changes()
                .map(|(id, changes)| (id, changes, s.edit.scratch().map(|f| f.missing_fields())))
        });
        let Some((id, changes, missing)) = pending else {
            return Ok(SaveOutcome::NotEditing);
        };

        if let Some(missing) = missing.filter(|m| !m.is_empty()) {
            let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
            let err = DomainError::InvalidInput(format!("missing required fields: {}", names.join(", ")));
            self.report(&err);
            return Err(err);
        }

        if changes.is_empty() {
            self.cancel_edit();
            return Ok(SaveOutcome::Unchanged);
        }

        if let Err(err) = self.backend.update(pool, &id, &changes).await {
            error!(%pool, %id, error = %err, "Error saving item");
            let err = DomainError::from(err);
            self.report(&err);
            return Err(err);
        }

        info!(%pool, %id, "Saved item");
        let saved = self.state.update_state(|s| {
            let saved = s.items.iter_mut().find(|item| item.id == id).map(|item| {
                changes.apply_to(item);
                item.clone()
            });
            if s.edit.is_editing(&id) {
                s.edit = EditState::Viewing;
            }
            s.items_changed();
            saved
        });

        saved
            .map(SaveOutcome::Saved)
            .ok_or_else(|| DomainError::NotFound(format!("item {id}")))
    }

    /// Delete a record once the user confirms
    pub async fn delete(&self, id: &ItemId, confirm: &dyn ConfirmPrompt) -> DomainResult<DeleteOutcome> {
        let pool = self.pool();
        let Some(gpu) = self.state.with_state(|s| s.find(id).map(|item| item.gpu.clone())) else {
            return Err(DomainError::NotFound(format!("item {id}")));
        };

        if !confirm.confirm(&format!("Delete {gpu}?")) {
            debug!(%pool, %id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.backend.delete(pool, id).await {
            Ok(()) => {
                info!(%pool, %id, "Deleted item");
                self.state.update_state(|s| {
                    s.items.retain(|item| &item.id != id);
                    if s.edit.is_editing(id) {
                        s.edit = EditState::Viewing;
                    }
                    s.items_changed();
                });
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                warn!(%pool, %id, error = %err, "Error deleting item");
                let err = DomainError::from(err);
                self.report(&err);
                Err(err)
            }
        }
    }
}
