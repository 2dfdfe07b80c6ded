//! Inventory Item Entity
//!
//! A single GPU record as stored in one pool's table, plus the form-bound
//! shapes used to create and edit it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::{DomainError, DomainResult};

/// Opaque record identifier assigned by the backend.
///
/// Tables may use text or numeric keys; both are held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ItemId(s),
            RawId::Signed(n) => ItemId(n.to_string()),
            RawId::Unsigned(n) => ItemId(n.to_string()),
        })
    }
}

/// Billing status of a GPU
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Billed,
    NotBilled,
    Consumed,
    /// Any other value found in the table, kept verbatim
    Other(String),
}

impl ItemStatus {
    /// Values offered by the status selectors
    pub const KNOWN: [ItemStatus; 3] = [ItemStatus::Billed, ItemStatus::NotBilled, ItemStatus::Consumed];

    /// Wire value
    pub fn as_str(&self) -> &str {
        match self {
            ItemStatus::Billed => "billed",
            ItemStatus::NotBilled => "not billed",
            ItemStatus::Consumed => "consumed",
            ItemStatus::Other(raw) => raw,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            ItemStatus::Billed => "Billed",
            ItemStatus::NotBilled => "Not Billed",
            ItemStatus::Consumed => "Consumed",
            ItemStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ItemStatus::Other(_))
    }
}

impl From<String> for ItemStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "billed" => ItemStatus::Billed,
            "not billed" => ItemStatus::NotBilled,
            "consumed" => ItemStatus::Consumed,
            _ => ItemStatus::Other(raw),
        }
    }
}

impl From<&str> for ItemStatus {
    fn from(raw: &str) -> Self {
        ItemStatus::from(raw.to_string())
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inventory record (matches the backend row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub gpu: String,
    pub status: ItemStatus,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InventoryItem {
    /// Editable copy of this record's fields
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            gpu: self.gpu.clone(),
            status: self.status.as_str().to_string(),
            location: self.location.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }

    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// One editable column of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Gpu,
    Status,
    Location,
    Notes,
}

impl ItemField {
    pub const ALL: [ItemField; 4] = [ItemField::Gpu, ItemField::Status, ItemField::Location, ItemField::Notes];

    pub fn name(self) -> &'static str {
        match self {
            ItemField::Gpu => "gpu",
            ItemField::Status => "status",
            ItemField::Location => "location",
            ItemField::Notes => "notes",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ItemField::Gpu => "GPU Model",
            ItemField::Status => "Status",
            ItemField::Location => "Location",
            ItemField::Notes => "Notes",
        }
    }

    fn is_required(self) -> bool {
        !matches!(self, ItemField::Notes)
    }
}

/// Form-bound record fields: the add-row draft and the edit scratch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemFields {
    pub gpu: String,
    pub status: String,
    pub location: String,
    pub notes: String,
}

/// Draft of a record that does not exist yet
pub type ItemDraft = ItemFields;

impl ItemFields {
    pub fn get(&self, field: ItemField) -> &str {
        match field {
            ItemField::Gpu => &self.gpu,
            ItemField::Status => &self.status,
            ItemField::Location => &self.location,
            ItemField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: ItemField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ItemField::Gpu => self.gpu = value,
            ItemField::Status => self.status = value,
            ItemField::Location => self.location = value,
            ItemField::Notes => self.notes = value,
        }
    }

    /// Required fields that are blank after trimming
    pub fn missing_fields(&self) -> Vec<ItemField> {
        ItemField::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.get(*field).trim().is_empty())
            .collect()
    }

    /// Check required fields and build the insert payload
    pub fn validate(&self) -> DomainResult<NewItem> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
            return Err(DomainError::InvalidInput(format!(
                "missing required fields: {}",
                names.join(", ")
            )));
        }

        let notes = self.notes.trim();
        Ok(NewItem {
            gpu: self.gpu.trim().to_string(),
            status: ItemStatus::from(self.status.trim()),
            location: self.location.trim().to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

/// Insert payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewItem {
    pub gpu: String,
    pub status: ItemStatus,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewItem {
    /// Record this payload becomes once the backend assigns an id
    pub fn with_id(self, id: ItemId) -> InventoryItem {
        InventoryItem {
            id,
            gpu: self.gpu,
            status: self.status,
            location: self.location,
            notes: self.notes,
        }
    }
}

/// Update payload: only the columns that differ from the cached record
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// `Some(None)` clears the column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl ItemChanges {
    /// Diff an edited scratch against the record it was copied from
    pub fn between(original: &ItemFields, edited: &ItemFields) -> Self {
        let changed = |field: ItemField| {
            let value = edited.get(field).trim();
            (value != original.get(field).trim()).then(|| value.to_string())
        };

        Self {
            gpu: changed(ItemField::Gpu),
            status: changed(ItemField::Status).map(ItemStatus::from),
            location: changed(ItemField::Location),
            notes: changed(ItemField::Notes).map(|notes| (!notes.is_empty()).then_some(notes)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gpu.is_none() && self.status.is_none() && self.location.is_none() && self.notes.is_none()
    }

    /// Merge into a cached record after the backend accepted the update
    pub fn apply_to(&self, item: &mut InventoryItem) {
        if let Some(gpu) = &self.gpu {
            item.gpu = gpu.clone();
        }
        if let Some(status) = &self.status {
            item.status = status.clone();
        }
        if let Some(location) = &self.location {
            item.location = location.clone();
        }
        if let Some(notes) = &self.notes {
            item.notes = notes.clone();
        }
    }
}
