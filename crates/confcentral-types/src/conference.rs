use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// City assigned to conferences created without one.
pub const DEFAULT_CITY: &str = "Default City";

/// Topics assigned to conferences created without any.
pub const DEFAULT_TOPICS: [&str; 2] = ["Default", "Topic"];

/// Unique identifier for a conference, wrapping a UUID v7 (time-sortable).
///
/// This is the opaque conference key handed out to API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConferenceId(pub Uuid);

impl ConferenceId {
    /// Create a new ConferenceId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a ConferenceId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ConferenceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConferenceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// A conference: the parent container for sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    pub id: ConferenceId,
    pub name: String,
    pub description: Option<String>,
    /// User id of the profile that created the conference.
    pub organizer_user_id: String,
    pub topics: Vec<String>,
    pub city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Month of `start_date` (1-12), or 0 when the conference has no start date.
    pub month: u32,
    pub max_attendees: i64,
    pub seats_available: i64,
    pub created_at: DateTime<Utc>,
}

impl Conference {
    /// Whether `date` falls within the conference's date range.
    ///
    /// An open end of the range (missing start or end date) accepts any date
    /// on that side.
    pub fn covers(&self, date: NaiveDate) -> bool {
        let after_start = self.start_date.is_none_or(|start| date >= start);
        let before_end = self.end_date.is_none_or(|end| date <= end);
        after_start && before_end
    }
}

/// Month number for an optional start date (0 when absent).
pub fn month_of(start_date: Option<NaiveDate>) -> u32 {
    start_date.map(|d| d.month()).unwrap_or(0)
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// Longer ISO-8601 strings are accepted and truncated to their date part.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

/// A conference together with the display name of its organizer.
#[derive(Debug, Clone, Serialize)]
pub struct ConferenceView {
    #[serde(flatten)]
    pub conference: Conference,
    pub organizer_display_name: Option<String>,
}

/// Request to create a conference. Only `name` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConferenceRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub topics: Option<Vec<String>>,
    pub city: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    pub max_attendees: Option<i64>,
}

/// Partial update of a conference. Only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateConferenceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub topics: Option<Vec<String>>,
    pub city: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_attendees: Option<i64>,
    pub seats_available: Option<i64>,
}

/// Conference fields that may appear in a query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConferenceField {
    City,
    Topic,
    Month,
    MaxAttendees,
}

impl ConferenceField {
    /// Whether filter values for this field are integers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ConferenceField::Month | ConferenceField::MaxAttendees)
    }
}

impl fmt::Display for ConferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConferenceField::City => write!(f, "CITY"),
            ConferenceField::Topic => write!(f, "TOPIC"),
            ConferenceField::Month => write!(f, "MONTH"),
            ConferenceField::MaxAttendees => write!(f, "MAX_ATTENDEES"),
        }
    }
}

impl FromStr for ConferenceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CITY" => Ok(ConferenceField::City),
            "TOPIC" => Ok(ConferenceField::Topic),
            "MONTH" => Ok(ConferenceField::Month),
            "MAX_ATTENDEES" => Ok(ConferenceField::MaxAttendees),
            other => Err(format!("invalid filter field: '{other}'")),
        }
    }
}

/// Comparison operators accepted in conference query filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Eq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    Ne,
}

impl Operator {
    /// Every operator except equality counts as an inequality filter.
    pub fn is_inequality(&self) -> bool {
        !matches!(self, Operator::Eq)
    }

    /// SQL comparison symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gteq => ">=",
            Operator::Lt => "<",
            Operator::Lteq => "<=",
            Operator::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "EQ"),
            Operator::Gt => write!(f, "GT"),
            Operator::Gteq => write!(f, "GTEQ"),
            Operator::Lt => write!(f, "LT"),
            Operator::Lteq => write!(f, "LTEQ"),
            Operator::Ne => write!(f, "NE"),
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EQ" => Ok(Operator::Eq),
            "GT" => Ok(Operator::Gt),
            "GTEQ" => Ok(Operator::Gteq),
            "LT" => Ok(Operator::Lt),
            "LTEQ" => Ok(Operator::Lteq),
            "NE" => Ok(Operator::Ne),
            other => Err(format!("invalid filter operator: '{other}'")),
        }
    }
}

/// One user-supplied conference filter, as received on the wire.
///
/// Field and operator stay as strings here so that an unknown name is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConferenceQueryForm {
    pub field: String,
    pub operator: String,
    pub value: String,
}

/// A batch of conference filters combined with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConferenceQueryForms {
    #[serde(default)]
    pub filters: Vec<ConferenceQueryForm>,
}
