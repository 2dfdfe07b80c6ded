//! Row Edit State
//!
//! A pool has at most one row being edited. The scratch copy lives here
//! until it is saved or discarded.

use super::item::{InventoryItem, ItemChanges, ItemField, ItemFields, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No row is being edited
    #[default]
    Viewing,
    /// One row is being edited
    Editing {
        id: ItemId,
        /// Fields as they were when editing started
        original: ItemFields,
        /// In-progress, unsaved copy
        scratch: ItemFields,
    },
}

impl EditState {
    /// Start editing a record with a fresh scratch copy
    pub fn begin(item: &InventoryItem) -> Self {
        let fields = item.fields();
        EditState::Editing {
            id: item.id.clone(),
            original: fields.clone(),
            scratch: fields,
        }
    }

    pub fn editing_id(&self) -> Option<&ItemId> {
        match self {
            EditState::Viewing => None,
            EditState::Editing { id, .. } => Some(id),
        }
    }

    pub fn is_editing(&self, item_id: &ItemId) -> bool {
        self.editing_id() == Some(item_id)
    }

    pub fn scratch(&self) -> Option<&ItemFields> {
        match self {
            EditState::Viewing => None,
            EditState::Editing { scratch, .. } => Some(scratch),
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        match self {
            EditState::Viewing => false,
            EditState::Editing { original, scratch, .. } => !ItemChanges::between(original, scratch).is_empty(),
        }
    }

    /// Update one scratch field. Returns false when no row is being edited.
    pub fn set_field(&mut self, field: ItemField, value: impl Into<String>) -> bool {
        match self {
            EditState::Viewing => false,
            EditState::Editing { scratch, .. } => {
                scratch.set(field, value);
                true
            }
        }
    }

    /// Target id and the columns that differ from the original
    pub fn pending_changes(&self) -> Option<(ItemId, ItemChanges)> {
        match self {
            EditState::Viewing => None,
            EditState::Editing { id, original, scratch } => {
                Some((id.clone(), ItemChanges::between(original, scratch)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemStatus;

    fn item(id: &str) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(id),
            gpu: "A100".to_string(),
            status: ItemStatus::Billed,
            location: "SJC".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_viewing_ignores_field_updates() {
        let mut state = EditState::default();
        assert!(!state.set_field(ItemField::Gpu, "H100"));
        assert_eq!(state, EditState::Viewing);
        assert!(state.pending_changes().is_none());
    }

    #[test]
    fn test_scratch_tracks_unsaved_changes() {
        let mut state = EditState::begin(&item("1"));
        assert!(state.is_editing(&ItemId::new("1")));
        assert!(!state.has_unsaved_changes());

        assert!(state.set_field(ItemField::Location, "TPE"));
        assert!(state.has_unsaved_changes());
        assert_eq!(state.scratch().map(|s| s.location.as_str()), Some("TPE"));

        let (id, changes) = state.pending_changes().unwrap();
        assert_eq!(id.as_str(), "1");
        assert_eq!(changes.location.as_deref(), Some("TPE"));
        assert!(changes.gpu.is_none());
    }
}
