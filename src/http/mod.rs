//! JSON-over-HTTP surface for lists and items.
//!
//! Thin routing layer: handlers validate input, call the store, and map
//! [`AppError`](crate::AppError) variants to status codes.

pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{AppError, Result};

pub use state::AppState;

/// Build the router with every route and a permissive CORS policy.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/lists", post(handlers::create_list))
        .route("/api/lists/{id}", get(handlers::get_list))
        .route("/api/lists/{list_id}/items", post(handlers::add_item))
        .route(
            "/api/lists/{list_id}/items/{item_id}",
            patch(handlers::update_item).delete(handlers::delete_item),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind `config.bind_address()` and serve until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the listener cannot bind or the server fails.
pub async fn serve(state: AppState, ct: CancellationToken) -> Result<()> {
    let bind = state.config.bind_address();
    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|err| AppError::Io(format!("failed to bind {bind}: {err}")))?;
    serve_on(listener, state, ct).await
}

/// Serve on an already-bound listener until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails.
pub async fn serve_on(listener: TcpListener, state: AppState, ct: CancellationToken) -> Result<()> {
    let local = listener.local_addr()?;
    info!(%local, "http server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("http server error: {err}")))?;

    info!("http server shut down");
    Ok(())
}
