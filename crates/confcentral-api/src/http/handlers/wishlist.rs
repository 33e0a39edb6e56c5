//! Wishlist handlers.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use confcentral_types::session::Session;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/wishlist - Sessions in the order they were added.
pub async fn list_wishlist(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let sessions = state.profile_service.wishlist_sessions(&caller).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(sessions, request_id, elapsed).with_link("self", "/api/v1/wishlist"),
    ))
}

/// POST /api/v1/wishlist/{session_key}
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(session_key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state
        .profile_service
        .add_to_wishlist(&caller, &session_key)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(
            serde_json::json!({"added": true, "session_key": session_key}),
            request_id,
            elapsed,
        )
        .with_link("wishlist", "/api/v1/wishlist"),
    ))
}

/// DELETE /api/v1/wishlist/{session_key}
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(session_key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let removed = state
        .profile_service
        .remove_from_wishlist(&caller, &session_key)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"removed": removed, "session_key": session_key}),
        request_id,
        elapsed,
    )))
}
