//! Filtering and Stats
//!
//! Pure projections over a pool's cached items.

use serde::{Deserialize, Serialize};

use super::item::{InventoryItem, ItemStatus};

/// Items whose gpu contains `needle`, ignoring case. An empty needle keeps everything.
pub fn filter_items<'a>(items: &'a [InventoryItem], needle: &str) -> Vec<&'a InventoryItem> {
    let needle = needle.to_lowercase();
    items
        .iter()
        .filter(|item| needle.is_empty() || item.gpu.to_lowercase().contains(&needle))
        .collect()
}

/// Per-status counts over a list of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total: usize,
    pub billed: usize,
    pub not_billed: usize,
    pub consumed: usize,
}

impl InventoryStats {
    /// Single pass count. Unrecognized statuses only add to `total`.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Self {
        items.into_iter().fold(Self::default(), |mut stats, item| {
            stats.total += 1;
            match item.status {
                ItemStatus::Billed => stats.billed += 1,
                ItemStatus::NotBilled => stats.not_billed += 1,
                ItemStatus::Consumed => stats.consumed += 1,
                ItemStatus::Other(_) => {}
            }
            stats
        })
    }

    /// Items whose status is none of the named buckets
    pub fn unrecognized(&self) -> usize {
        self.total - (self.billed + self.not_billed + self.consumed)
    }
}
