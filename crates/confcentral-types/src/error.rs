use thiserror::Error;

/// Errors related to conference, registration and announcement operations.
#[derive(Debug, Error)]
pub enum ConferenceError {
    #[error("no conference found with key: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to session creation and session queries.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no conference found with key: {0}")]
    ConferenceNotFound(String),

    #[error("no session found with key: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to speaker operations.
#[derive(Debug, Error)]
pub enum SpeakerError {
    #[error("no speaker found with email: {0}")]
    NotFound(String),

    #[error("speaker '{0}' already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to profiles and wishlists.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("no session found with key: {0}")]
    SessionNotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in confcentral-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
