//! Request and response bodies for the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::list::List;

/// `POST /api/lists` body.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    /// Display name for the new list.
    #[serde(default)]
    pub name: String,
}

/// `POST /api/lists/{listId}/items` body.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    /// What to avoid doing.
    #[serde(default)]
    pub description: String,
    /// Optional deadline.
    #[serde(default)]
    pub avoid_until: Option<DateTime<Utc>>,
}

/// `PATCH /api/lists/{listId}/items/{itemId}` body; every field optional.
///
/// `avoid_until` is only applied together with `description`, and an
/// absent value clears the deadline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    /// New checkbox state.
    #[serde(default)]
    pub is_checked: Option<bool>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement deadline.
    #[serde(default)]
    pub avoid_until: Option<DateTime<Utc>>,
}

/// Response for a freshly created list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    /// Short public id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Shareable frontend path.
    pub url: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&List> for ListSummary {
    fn from(list: &List) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone(),
            url: format!("/l/{}", list.id),
            created_at: list.created_at,
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process answers.
    pub status: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}
