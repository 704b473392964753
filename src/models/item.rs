//! Todont item model and its derived read view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity;

/// A behavior the user is trying to stop.
///
/// `is_checked` starts `true` ("not yet avoided"); unchecking marks it as
/// successfully avoided.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item identifier (UUID v4), immutable.
    pub id: String,
    /// What to avoid doing; never empty.
    pub description: String,
    /// Deadline before which the item cannot be unchecked.
    pub avoid_until: Option<DateTime<Utc>>,
    /// `true` until the user marks the behavior as avoided.
    pub is_checked: bool,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Construct a fresh, checked item.
    #[must_use]
    pub fn new(
        description: String,
        avoid_until: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description,
            avoid_until,
            is_checked: true,
            created_at,
        }
    }

    /// See [`activity::is_active`].
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        activity::is_active(self.is_checked, self.avoid_until, now)
    }

    /// See [`activity::can_uncheck`].
    #[must_use]
    pub fn can_uncheck(&self, now: DateTime<Utc>) -> bool {
        activity::can_uncheck(self.avoid_until, now)
    }

    /// Snapshot the item with its derived flags evaluated at `now`.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> ItemView {
        ItemView {
            id: self.id.clone(),
            description: self.description.clone(),
            avoid_until: self.avoid_until,
            is_checked: self.is_checked,
            is_active: self.is_active(now),
            can_uncheck: self.can_uncheck(now),
            created_at: self.created_at,
        }
    }
}

/// Item as presented to callers, including derived state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    /// Item identifier.
    pub id: String,
    /// What to avoid doing.
    pub description: String,
    /// Optional deadline.
    pub avoid_until: Option<DateTime<Utc>>,
    /// Stored checkbox state.
    pub is_checked: bool,
    /// Derived: still needs attention.
    pub is_active: bool,
    /// Derived: uncheck is currently allowed.
    pub can_uncheck: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
