//! Session HTTP handlers.
//!
//! The conference-scoped queries go through the query planner in
//! `confcentral-core`; handlers only parse parameters and wrap results.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;

use confcentral_types::session::{CreateSessionRequest, Session, SessionType};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::{DurationQuery, SpeakerQuery, TypeQuery, WindowQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn parse_session_type(raw: &str) -> Result<SessionType, AppError> {
    raw.parse::<SessionType>().map_err(AppError::Validation)
}

fn sessions_response(
    sessions: Vec<Session>,
    request_id: String,
    start: Instant,
    self_link: &str,
) -> Json<ApiResponse<Vec<Session>>> {
    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(sessions, request_id, elapsed).with_link("self", self_link))
}

/// GET /api/v1/conferences/{key}/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let sessions = state.session_service.conference_sessions(&key).await?;
    Ok(sessions_response(
        sessions,
        request_id,
        start,
        &format!("/api/v1/conferences/{key}/sessions"),
    ))
}

/// POST /api/v1/conferences/{key}/sessions - Organizer only.
pub async fn create_session(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(key): Path<String>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<Session>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session = state
        .session_service
        .create_session(&caller, &key, body)
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(
        ApiResponse::success(session, request_id, elapsed)
            .with_link("conference", &format!("/api/v1/conferences/{key}")),
    ))
}

/// GET /api/v1/conferences/{key}/sessions/by-type?type=
pub async fn sessions_by_type(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<TypeQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_type = parse_session_type(&query.session_type)?;
    let sessions = state
        .session_service
        .sessions_by_type(&key, session_type)
        .await?;
    Ok(sessions_response(
        sessions,
        request_id,
        start,
        &format!("/api/v1/conferences/{key}/sessions/by-type?type={session_type}"),
    ))
}

/// GET /api/v1/conferences/{key}/sessions/by-duration?max_duration=
pub async fn sessions_by_duration(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<DurationQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let sessions = state
        .session_service
        .sessions_by_duration(&key, query.max_duration)
        .await?;
    Ok(sessions_response(
        sessions,
        request_id,
        start,
        &format!(
            "/api/v1/conferences/{key}/sessions/by-duration?max_duration={}",
            query.max_duration
        ),
    ))
}

/// GET /api/v1/conferences/{key}/sessions/non-workshop-before-seven
pub async fn non_workshop_before_seven(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let sessions = state
        .session_service
        .non_workshop_before_seven(&key)
        .await?;
    Ok(sessions_response(
        sessions,
        request_id,
        start,
        &format!("/api/v1/conferences/{key}/sessions/non-workshop-before-seven"),
    ))
}

/// GET /api/v1/conferences/{key}/sessions/window?before=&after=&exclude_type=
pub async fn sessions_in_window(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let excluded = query
        .exclude_type
        .as_deref()
        .map(parse_session_type)
        .transpose()?;
    let sessions = state
        .session_service
        .sessions_in_window(&key, &query.before, query.after.as_deref(), excluded)
        .await?;
    Ok(sessions_response(
        sessions,
        request_id,
        start,
        &format!("/api/v1/conferences/{key}/sessions/window"),
    ))
}

/// GET /api/v1/conferences/{key}/featured-speaker
pub async fn featured_speaker(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let message = state.session_service.featured_speaker(&key).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"message": message}),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/sessions/by-speaker?speaker= - Across all conferences.
pub async fn sessions_by_speaker(
    State(state): State<AppState>,
    Query(query): Query<SpeakerQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let sessions = state
        .session_service
        .sessions_by_speaker(&query.speaker)
        .await?;
    Ok(sessions_response(
        sessions,
        request_id,
        start,
        "/api/v1/sessions/by-speaker",
    ))
}
