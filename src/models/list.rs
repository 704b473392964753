//! Todont list model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemView};

/// A named, shareable collection of items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// Short public identifier.
    pub id: String,
    /// Display name; never empty.
    pub name: String,
    /// Items in insertion order.
    pub items: Vec<Item>,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
}

impl List {
    /// Construct an empty list.
    #[must_use]
    pub fn new(id: String, name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            items: Vec::new(),
            created_at,
        }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Mutable lookup of an item by id.
    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Snapshot the list with every item's derived flags evaluated at `now`.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> ListView {
        ListView {
            id: self.id.clone(),
            name: self.name.clone(),
            items: self.items.iter().map(|item| item.view(now)).collect(),
            created_at: self.created_at,
        }
    }
}

/// List as presented to callers, with derived item state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    /// List identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Items with derived state.
    pub items: Vec<ItemView>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
