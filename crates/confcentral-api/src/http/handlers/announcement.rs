//! Announcement handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/announcement - Empty message when nothing is nearly sold out.
pub async fn get_announcement(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message = state.conference_service.announcement().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"message": message}),
        request_id,
        elapsed,
    )))
}
