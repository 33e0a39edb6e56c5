//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use confcentral_types::error::{ConferenceError, ProfileError, SessionError, SpeakerError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conference, registration and announcement errors.
    Conference(ConferenceError),
    /// Session creation and query errors.
    Session(SessionError),
    /// Speaker errors.
    Speaker(SpeakerError),
    /// Profile and wishlist errors.
    Profile(ProfileError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error raised at the HTTP boundary.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ConferenceError> for AppError {
    fn from(e: ConferenceError) -> Self {
        AppError::Conference(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<SpeakerError> for AppError {
    fn from(e: SpeakerError) -> Self {
        AppError::Speaker(e)
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        AppError::Profile(e)
    }
}

impl AppError {
    /// HTTP status, machine-readable code and message for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str, String) {
        let message = self.to_string();
        let (status, code) = match self {
            AppError::Conference(ConferenceError::NotFound(_))
            | AppError::Session(SessionError::ConferenceNotFound(_)) => {
                (StatusCode::NOT_FOUND, "CONFERENCE_NOT_FOUND")
            }
            AppError::Session(SessionError::NotFound(_))
            | AppError::Profile(ProfileError::SessionNotFound(_)) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
            }
            AppError::Speaker(SpeakerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "SPEAKER_NOT_FOUND")
            }
            AppError::Conference(ConferenceError::InvalidArgument(_))
            | AppError::Session(SessionError::InvalidArgument(_))
            | AppError::Speaker(SpeakerError::InvalidArgument(_))
            | AppError::Profile(ProfileError::InvalidArgument(_))
            | AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Conference(ConferenceError::Forbidden(_))
            | AppError::Session(SessionError::Forbidden(_)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN")
            }
            AppError::Conference(ConferenceError::Conflict(_))
            | AppError::Speaker(SpeakerError::AlreadyExists(_))
            | AppError::Profile(ProfileError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Conference(ConferenceError::StorageError(_))
            | AppError::Session(SessionError::StorageError(_))
            | AppError::Speaker(SpeakerError::StorageError(_))
            | AppError::Profile(ProfileError::StorageError(_))
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        (status, code, message)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Conference(e) => write!(f, "{e}"),
            AppError::Session(e) => write!(f, "{e}"),
            AppError::Speaker(e) => write!(f, "{e}"),
            AppError::Profile(e) => write!(f, "{e}"),
            AppError::Unauthorized(msg) | AppError::Validation(msg) | AppError::Internal(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
