//! Query parameter extractors for session query endpoints.

use serde::Deserialize;

/// `?max_duration=` for the duration query.
#[derive(Debug, Deserialize)]
pub struct DurationQuery {
    pub max_duration: i64,
}

/// `?before=&after=&exclude_type=` for the start-time window query.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// Exclusive upper bound on start time, `HH:MM`.
    pub before: String,
    /// Inclusive lower bound on start time, `HH:MM`.
    pub after: Option<String>,
    pub exclude_type: Option<String>,
}

/// `?type=` for the by-type query.
#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub session_type: String,
}

/// `?speaker=` for the by-speaker query.
#[derive(Debug, Deserialize)]
pub struct SpeakerQuery {
    pub speaker: String,
}
