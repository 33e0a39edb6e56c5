//! Session repository trait definition and the store-executable session query.

use chrono::{NaiveDate, NaiveTime};
use confcentral_types::conference::ConferenceId;
use confcentral_types::error::RepositoryError;
use confcentral_types::session::{Session, SessionId, SessionType};

/// Direction of a range comparison against a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `value < limit`
    Below,
    /// `value <= limit`
    AtMost,
    /// `value > limit`
    Above,
    /// `value >= limit`
    AtLeast,
}

impl Bound {
    /// Whether `value` satisfies this bound against `limit`.
    pub fn holds<T: PartialOrd>(&self, value: &T, limit: &T) -> bool {
        match self {
            Bound::Below => value < limit,
            Bound::AtMost => value <= limit,
            Bound::Above => value > limit,
            Bound::AtLeast => value >= limit,
        }
    }

    /// SQL comparison symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Bound::Below => "<",
            Bound::AtMost => "<=",
            Bound::Above => ">",
            Bound::AtLeast => ">=",
        }
    }
}

/// Session fields that support range comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    Date,
    StartTime,
    Duration,
}

/// An inequality filter on a single session field.
///
/// The limit's type is tied to the field, so a filter can never compare a
/// duration against a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilter {
    Date(Bound, NaiveDate),
    StartTime(Bound, NaiveTime),
    Duration(Bound, i64),
}

impl RangeFilter {
    /// Start time strictly earlier than `time`.
    pub fn starts_before(time: NaiveTime) -> Self {
        RangeFilter::StartTime(Bound::Below, time)
    }

    /// Start time at or after `time`.
    pub fn starts_at_or_after(time: NaiveTime) -> Self {
        RangeFilter::StartTime(Bound::AtLeast, time)
    }

    /// Duration strictly shorter than `minutes`.
    pub fn shorter_than(minutes: i64) -> Self {
        RangeFilter::Duration(Bound::Below, minutes)
    }

    pub fn field(&self) -> SessionField {
        match self {
            RangeFilter::Date(..) => SessionField::Date,
            RangeFilter::StartTime(..) => SessionField::StartTime,
            RangeFilter::Duration(..) => SessionField::Duration,
        }
    }

    pub fn bound(&self) -> Bound {
        match self {
            RangeFilter::Date(bound, _)
            | RangeFilter::StartTime(bound, _)
            | RangeFilter::Duration(bound, _) => *bound,
        }
    }

    /// Evaluate the filter against a session.
    pub fn matches(&self, session: &Session) -> bool {
        match self {
            RangeFilter::Date(bound, limit) => bound.holds(&session.date, limit),
            RangeFilter::StartTime(bound, limit) => bound.holds(&session.start_time, limit),
            RangeFilter::Duration(bound, limit) => bound.holds(&session.duration, limit),
        }
    }
}

/// Store-executable session query.
///
/// Equality filters can be freely combined; there is room for exactly one
/// range filter. Results come back ordered by the range field (when present),
/// then by date, start time and creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQuery {
    pub conference_id: Option<ConferenceId>,
    pub session_type: Option<SessionType>,
    pub speaker: Option<String>,
    pub range: Option<RangeFilter>,
}

impl SessionQuery {
    /// All sessions of one conference.
    pub fn in_conference(conference_id: ConferenceId) -> Self {
        Self {
            conference_id: Some(conference_id),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, session_type: SessionType) -> Self {
        self.session_type = Some(session_type);
        self
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_range(mut self, range: RangeFilter) -> Self {
        self.range = Some(range);
        self
    }

    /// Evaluate every filter of the query against a session.
    pub fn matches(&self, session: &Session) -> bool {
        self.conference_id.is_none_or(|id| session.conference_id == id)
            && self.session_type.is_none_or(|t| session.session_type == t)
            && self
                .speaker
                .as_ref()
                .is_none_or(|s| session.speakers.iter().any(|sp| sp == s))
            && self.range.is_none_or(|r| r.matches(session))
    }
}

/// Repository trait for session persistence.
///
/// Implementations live in confcentral-infra (e.g., SqliteSessionRepository).
pub trait SessionRepository: Send + Sync {
    /// Create a new session. Returns the created session.
    fn create(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<Session, RepositoryError>> + Send;

    /// Get a session by its key.
    fn get_by_id(
        &self,
        id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// Get several sessions at once. Unknown keys are skipped; the result
    /// follows the order of `ids`.
    fn get_many(
        &self,
        ids: &[SessionId],
    ) -> impl std::future::Future<Output = Result<Vec<Session>, RepositoryError>> + Send;

    /// Run a store-executable query.
    fn find(
        &self,
        query: &SessionQuery,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, RepositoryError>> + Send;
}
