//! Speaker handlers. Speakers are keyed by normalized email.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use confcentral_types::speaker::{CreateSpeakerRequest, Speaker};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/speakers
pub async fn create_speaker(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateSpeakerRequest>,
) -> Result<Json<ApiResponse<Speaker>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let speaker = state.speaker_service.create_speaker(body).await?;
    let email = speaker.email.clone();
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(speaker, request_id, elapsed)
            .with_link("self", &format!("/api/v1/speakers/{email}"))
            .with_link(
                "sessions",
                &format!("/api/v1/sessions/by-speaker?speaker={email}"),
            ),
    ))
}

/// GET /api/v1/speakers
pub async fn list_speakers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Speaker>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let speakers = state.speaker_service.list_speakers().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(speakers, request_id, elapsed).with_link("self", "/api/v1/speakers"),
    ))
}

/// GET /api/v1/speakers/{email}
pub async fn get_speaker(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Speaker>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let speaker = state.speaker_service.get_speaker(&email).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(speaker, request_id, elapsed)))
}

/// DELETE /api/v1/speakers/{email}
pub async fn delete_speaker(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state.speaker_service.delete_speaker(&email).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"deleted": true, "email": email}),
        request_id,
        elapsed,
    )))
}
