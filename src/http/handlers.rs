//! HTTP handlers translating requests into [`ListStore`](crate::persistence::ListStore) calls.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use crate::models::item::ItemView;
use crate::models::list::ListView;
use crate::models::require_text;
use crate::{AppError, Result};

use super::state::AppState;
use super::types::{
    CreateItemRequest, CreateListRequest, HealthResponse, ListSummary, UpdateItemRequest,
};

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: state.clock.now(),
    })
}

/// `POST /api/lists`.
///
/// # Errors
///
/// 400 for a blank name.
pub async fn create_list(
    State(state): State<AppState>,
    Json(request): Json<CreateListRequest>,
) -> Result<impl IntoResponse> {
    require_text("name", &request.name)?;
    let list = state.store.create_list(&request.name).await?;
    let location = format!("/api/lists/{}", list.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ListSummary::from(&list)),
    ))
}

/// `GET /api/lists/{id}`.
///
/// # Errors
///
/// 404 when the list does not exist.
pub async fn get_list(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<ListView>> {
    let list = state
        .store
        .get_list(&list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("list '{list_id}'")))?;
    Ok(Json(list.view(state.clock.now())))
}

/// `POST /api/lists/{listId}/items`.
///
/// # Errors
///
/// 400 for a blank description, 404 when the list does not exist.
pub async fn add_item(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Json(request): Json<CreateItemRequest>,
) -> Result<impl IntoResponse> {
    require_text("description", &request.description)?;
    let item = state
        .store
        .add_item(&list_id, &request.description, request.avoid_until)
        .await?;
    let location = format!("/api/lists/{list_id}/items/{}", item.id);
    let view: ItemView = item.view(state.clock.now());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(view)))
}

/// `PATCH /api/lists/{listId}/items/{itemId}`.
///
/// Applies the status change first, then the description/deadline edit.
///
/// # Errors
///
/// 404 when the list or item is missing; 400 for a blank description or
/// an uncheck before the avoid-until date.
pub async fn update_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(String, String)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<StatusCode> {
    let list = state
        .store
        .get_list(&list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("list '{list_id}'")))?;
    let item = list
        .item(&item_id)
        .ok_or_else(|| AppError::NotFound(format!("item '{item_id}' in list '{list_id}'")))?;

    if let Some(is_checked) = request.is_checked {
        if !is_checked && !item.can_uncheck(state.clock.now()) {
            info!(list_id = %list_id, item_id = %item_id, "uncheck rejected before avoid-until");
            return Err(AppError::Validation(
                "cannot uncheck item before avoid-until date has passed".into(),
            ));
        }
        state
            .store
            .set_item_checked(&list_id, &item_id, is_checked)
            .await?;
    }

    if let Some(description) = request.description {
        require_text("description", &description)?;
        state
            .store
            .update_item(&list_id, &item_id, &description, request.avoid_until)
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/lists/{listId}/items/{itemId}`.
///
/// # Errors
///
/// 404 when the list or item is missing.
pub async fn delete_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    state.store.delete_item(&list_id, &item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
