//! Residual predicates and the result filter.
//!
//! A residual predicate holds the constraints a store query could not
//! express. It is evaluated client-side over the candidates the store
//! returned.

use confcentral_types::session::{Session, SessionType};

use crate::repository::session::RangeFilter;

/// A single constraint on a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `session_type == t`
    TypeIs(SessionType),
    /// `session_type != t`
    TypeIsNot(SessionType),
    /// The session lists this speaker key.
    Speaker(String),
    /// An inequality on date, start time or duration.
    Range(RangeFilter),
}

impl Constraint {
    /// Whether the constraint holds for `session`.
    pub fn holds(&self, session: &Session) -> bool {
        match self {
            Constraint::TypeIs(t) => session.session_type == *t,
            Constraint::TypeIsNot(t) => session.session_type != *t,
            Constraint::Speaker(email) => session.speakers.iter().any(|s| s == email),
            Constraint::Range(range) => range.matches(session),
        }
    }
}

/// Conjunction of constraints left over after query planning.
///
/// An empty predicate keeps every session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidualPredicate {
    constraints: Vec<Constraint>,
}

impl ResidualPredicate {
    /// A predicate that keeps everything.
    pub fn keep_all() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// `keep(session)`: true when every residual constraint holds.
    pub fn keep(&self, session: &Session) -> bool {
        self.constraints.iter().all(|c| c.holds(session))
    }
}

/// Apply a residual predicate to store results.
///
/// Returns the order-preserving subsequence of `candidates` that the
/// predicate keeps. Records are moved through untouched.
pub fn apply(candidates: Vec<Session>, residual: &ResidualPredicate) -> Vec<Session> {
    if residual.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|session| residual.keep(session))
        .collect()
}
