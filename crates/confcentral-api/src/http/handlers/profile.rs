//! Profile handlers. Every route acts on the authenticated caller.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use confcentral_types::conference::ConferenceView;
use confcentral_types::profile::{Profile, UpdateProfileRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/profile - Creates a default profile on first access.
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let profile = state.profile_service.get_profile(&caller).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(profile, request_id, elapsed)
            .with_link("self", "/api/v1/profile")
            .with_link("wishlist", "/api/v1/wishlist"),
    ))
}

/// PUT /api/v1/profile
pub async fn save_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let profile = state.profile_service.save_profile(&caller, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(profile, request_id, elapsed).with_link("self", "/api/v1/profile"),
    ))
}

/// GET /api/v1/profile/conferences/created
pub async fn conferences_created(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<ConferenceView>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conferences = state
        .conference_service
        .conferences_created(&caller)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(conferences, request_id, elapsed)))
}

/// GET /api/v1/profile/conferences/attending
pub async fn conferences_to_attend(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<ApiResponse<Vec<ConferenceView>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conferences = state
        .conference_service
        .conferences_to_attend(&caller)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(conferences, request_id, elapsed)))
}
