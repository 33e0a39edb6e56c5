//! Conference handlers for the REST API.
//!
//! Endpoints:
//! - POST   /api/v1/conferences                        - Create a conference
//! - POST   /api/v1/conferences/query                  - Filter conferences
//! - GET    /api/v1/conferences/{key}                  - Get a conference
//! - PUT    /api/v1/conferences/{key}                  - Update a conference
//! - DELETE /api/v1/conferences/{key}                  - Delete a conference
//! - POST   /api/v1/conferences/{key}/registration     - Register the caller
//! - DELETE /api/v1/conferences/{key}/registration     - Unregister the caller

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use confcentral_types::conference::{
    ConferenceQueryForms, ConferenceView, CreateConferenceRequest, UpdateConferenceRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn conference_links(resp: ApiResponse<ConferenceView>, key: &str) -> ApiResponse<ConferenceView> {
    resp.with_link("self", &format!("/api/v1/conferences/{key}"))
        .with_link("sessions", &format!("/api/v1/conferences/{key}/sessions"))
        .with_link(
            "registration",
            &format!("/api/v1/conferences/{key}/registration"),
        )
}

/// POST /api/v1/conferences - Create a conference organised by the caller.
pub async fn create_conference(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(body): Json<CreateConferenceRequest>,
) -> Result<Json<ApiResponse<ConferenceView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let view = state
        .conference_service
        .create_conference(&caller, body)
        .await?;
    let key = view.conference.id.to_string();
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(conference_links(
        ApiResponse::success(view, request_id, elapsed),
        &key,
    )))
}

/// POST /api/v1/conferences/query - Run `{field, operator, value}` filters.
pub async fn query_conferences(
    State(state): State<AppState>,
    Json(body): Json<ConferenceQueryForms>,
) -> Result<Json<ApiResponse<Vec<ConferenceView>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let conferences = state
        .conference_service
        .query_conferences(&body.filters)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(conferences, request_id, elapsed)
            .with_link("self", "/api/v1/conferences/query"),
    ))
}

/// GET /api/v1/conferences/{key}
pub async fn get_conference(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<ConferenceView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let view = state.conference_service.get_conference(&key).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(conference_links(
        ApiResponse::success(view, request_id, elapsed),
        &key,
    )))
}

/// PUT /api/v1/conferences/{key} - Partial update, organizer only.
pub async fn update_conference(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(key): Path<String>,
    Json(body): Json<UpdateConferenceRequest>,
) -> Result<Json<ApiResponse<ConferenceView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let view = state
        .conference_service
        .update_conference(&caller, &key, body)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(conference_links(
        ApiResponse::success(view, request_id, elapsed),
        &key,
    )))
}

/// DELETE /api/v1/conferences/{key} - Organizer only; removes sessions too.
pub async fn delete_conference(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state
        .conference_service
        .delete_conference(&caller, &key)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"deleted": true, "key": key}),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/conferences/{key}/registration
pub async fn register(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    state.conference_service.register(&caller, &key).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(
            serde_json::json!({"registered": true}),
            request_id,
            elapsed,
        )
        .with_link("conference", &format!("/api/v1/conferences/{key}")),
    ))
}

/// DELETE /api/v1/conferences/{key}/registration
pub async fn unregister(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let removed = state.conference_service.unregister(&caller, &key).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"unregistered": removed}),
        request_id,
        elapsed,
    )))
}
