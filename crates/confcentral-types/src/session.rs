use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::conference::ConferenceId;

/// Unique identifier for a session, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new SessionId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Kind of session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    #[default]
    NotSpecified,
    Keynote,
    Lecture,
    Workshop,
    Panel,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::NotSpecified => write!(f, "not_specified"),
            SessionType::Keynote => write!(f, "keynote"),
            SessionType::Lecture => write!(f, "lecture"),
            SessionType::Workshop => write!(f, "workshop"),
            SessionType::Panel => write!(f, "panel"),
        }
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "not_specified" => Ok(SessionType::NotSpecified),
            "keynote" => Ok(SessionType::Keynote),
            "lecture" => Ok(SessionType::Lecture),
            "workshop" => Ok(SessionType::Workshop),
            "panel" => Ok(SessionType::Panel),
            _ => Err(format!("invalid session type: '{s}'")),
        }
    }
}

/// A scheduled talk or workshop, owned by exactly one conference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub conference_id: ConferenceId,
    pub name: String,
    /// Keys (normalized emails) of the speakers presenting this session.
    pub speakers: Vec<String>,
    pub highlights: Vec<String>,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub start_time: NaiveTime,
    /// Length in minutes.
    pub duration: i64,
    pub session_type: SessionType,
    pub location: Option<String>,
}

/// Request to create a session under a conference.
///
/// `name`, `date` and `start_time` are required; the service reports
/// missing values as validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub speakers: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    pub start_time: Option<String>,
    pub duration: Option<i64>,
    pub session_type: Option<SessionType>,
    pub location: Option<String>,
}

/// Parse a time of day written as `HH:MM` (seconds are tolerated).
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, String> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| format!("invalid time of day '{value}', expected HH:MM"))
}

/// Serde adapter rendering a `NaiveTime` as `HH:MM`, or `HH:MM:SS` when
/// the seconds are non-zero.
pub mod time_of_day {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let pattern = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        serializer.serialize_str(&time.format(pattern).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}
