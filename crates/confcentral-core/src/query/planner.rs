//! Session query planner.
//!
//! Splits a conjunction of session constraints into a store-executable
//! [`SessionQuery`] and a [`ResidualPredicate`]:
//!
//! - equality constraints (session type, speaker) go into the store query,
//!   one per field; repeats of an already-set field become residual
//! - the FIRST range constraint the caller supplied goes into the store
//!   query; every later range constraint becomes residual
//! - type exclusions (`!=`) are never store-executable and are always residual
//!
//! The first-range rule is fixed: for "before 19:00, not a workshop" the
//! store filters on start time and the type exclusion runs client-side.

use confcentral_types::conference::ConferenceId;
use confcentral_types::error::SessionError;
use confcentral_types::session::{SessionType, parse_time_of_day};

use super::residual::{Constraint, ResidualPredicate};
use crate::repository::session::{RangeFilter, SessionQuery};

/// Cut-off used by the "non-workshop sessions before seven" query.
pub const EVENING_CUTOFF: &str = "19:00";

/// A store query plus the constraints left for the result filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub query: SessionQuery,
    pub residual: ResidualPredicate,
}

/// Plan a conference-scoped conjunction of constraints.
pub fn plan(conference_id: ConferenceId, constraints: Vec<Constraint>) -> SessionPlan {
    let mut query = SessionQuery::in_conference(conference_id);
    let mut residual = ResidualPredicate::keep_all();

    for constraint in constraints {
        match constraint {
            Constraint::TypeIs(t) if query.session_type.is_none() => {
                query.session_type = Some(t);
            }
            Constraint::Speaker(email) if query.speaker.is_none() => {
                query.speaker = Some(email);
            }
            Constraint::Range(range) if query.range.is_none() => {
                query.range = Some(range);
            }
            other => residual.push(other),
        }
    }

    SessionPlan { query, residual }
}

/// Plan "start time earlier than `threshold` and type not `excluded`".
///
/// Fails with `InvalidArgument` if `threshold` is not an `HH:MM` time of day.
pub fn plan_before_excluding(
    conference_id: ConferenceId,
    threshold: &str,
    excluded: SessionType,
) -> Result<SessionPlan, SessionError> {
    plan_time_window(conference_id, threshold, None, Some(excluded))
}

/// Plan "start time in `[after, before)`, optionally excluding one type".
///
/// `before` is the store-side range; the lower bound and the type exclusion
/// are residual.
pub fn plan_time_window(
    conference_id: ConferenceId,
    before: &str,
    after: Option<&str>,
    excluded: Option<SessionType>,
) -> Result<SessionPlan, SessionError> {
    let before = parse_time_of_day(before).map_err(SessionError::InvalidArgument)?;

    let mut constraints = vec![Constraint::Range(RangeFilter::starts_before(before))];
    if let Some(after) = after {
        let after = parse_time_of_day(after).map_err(SessionError::InvalidArgument)?;
        constraints.push(Constraint::Range(RangeFilter::starts_at_or_after(after)));
    }
    if let Some(excluded) = excluded {
        constraints.push(Constraint::TypeIsNot(excluded));
    }

    Ok(plan(conference_id, constraints))
}

/// Plan "duration strictly less than `max_minutes`".
///
/// A single range filter, so nothing is left for the result filter.
/// Negative limits fail with `InvalidArgument`.
pub fn plan_duration_under(
    conference_id: ConferenceId,
    max_minutes: i64,
) -> Result<SessionPlan, SessionError> {
    if max_minutes < 0 {
        return Err(SessionError::InvalidArgument(format!(
            "maximum duration must not be negative, got {max_minutes}"
        )));
    }
    Ok(plan(
        conference_id,
        vec![Constraint::Range(RangeFilter::shorter_than(max_minutes))],
    ))
}
