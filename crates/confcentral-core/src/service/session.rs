//! Session service.
//!
//! Every conference-scoped read goes through the same pipeline: resolve the
//! conference, plan the constraints into a store query plus a residual
//! predicate, run the store query, then filter the candidates client-side.

use std::collections::HashSet;

use confcentral_types::conference::{Conference, ConferenceId, parse_calendar_date};
use confcentral_types::error::{RepositoryError, SessionError};
use confcentral_types::profile::Caller;
use confcentral_types::session::{
    CreateSessionRequest, Session, SessionId, SessionType, parse_time_of_day,
};
use confcentral_types::speaker::normalize_email;
use tracing::{debug, info};

use crate::query::planner::{self, EVENING_CUTOFF, SessionPlan};
use crate::query::residual::{self, Constraint};
use crate::repository::conference::ConferenceRepository;
use crate::repository::session::{SessionQuery, SessionRepository};
use crate::repository::speaker::SpeakerRepository;

const FEATURED_SPEAKER_SUFFIX: &str = " is the featured speaker for the following sessions: ";

fn storage_err(e: RepositoryError) -> SessionError {
    SessionError::StorageError(e.to_string())
}

/// Service for creating and querying sessions.
pub struct SessionService<C: ConferenceRepository, S: SessionRepository, K: SpeakerRepository> {
    conferences: C,
    sessions: S,
    speakers: K,
}

impl<C: ConferenceRepository, S: SessionRepository, K: SpeakerRepository> SessionService<C, S, K> {
    pub fn new(conferences: C, sessions: S, speakers: K) -> Self {
        Self {
            conferences,
            sessions,
            speakers,
        }
    }

    /// Create a session under a conference. Only the conference organizer
    /// may add sessions.
    pub async fn create_session(
        &self,
        caller: &Caller,
        conference_key: &str,
        request: CreateSessionRequest,
    ) -> Result<Session, SessionError> {
        let conference = self.resolve_conference(conference_key).await?;
        if conference.organizer_user_id != caller.user_id {
            return Err(SessionError::Forbidden(
                "Only the conference organizer can add sessions.".to_string(),
            ));
        }

        let name = request.name.trim().to_string();
        let (Some(date), Some(start_time)) = (request.date.as_deref(), request.start_time.as_deref())
        else {
            return Err(SessionError::InvalidArgument(
                "Session 'name', 'date' and 'start_time' fields are required".to_string(),
            ));
        };
        if name.is_empty() {
            return Err(SessionError::InvalidArgument(
                "Session 'name', 'date' and 'start_time' fields are required".to_string(),
            ));
        }

        let date = parse_calendar_date(date).map_err(SessionError::InvalidArgument)?;
        let start_time = parse_time_of_day(start_time).map_err(SessionError::InvalidArgument)?;
        if !conference.covers(date) {
            return Err(SessionError::InvalidArgument(format!(
                "session date {date} is outside the conference dates"
            )));
        }

        let duration = request.duration.unwrap_or(0);
        if duration < 0 {
            return Err(SessionError::InvalidArgument(
                "duration must not be negative".to_string(),
            ));
        }

        let speakers = self.check_speakers(&request.speakers).await?;

        let session = Session {
            id: SessionId::new(),
            conference_id: conference.id,
            name,
            speakers,
            highlights: request.highlights,
            date,
            start_time,
            duration,
            session_type: request.session_type.unwrap_or_default(),
            location: request.location.filter(|l| !l.trim().is_empty()),
        };

        let session = self.sessions.create(&session).await.map_err(storage_err)?;
        info!(
            session_id = %session.id,
            conference_id = %conference.id,
            session_type = %session.session_type,
            "session created"
        );
        Ok(session)
    }

    /// All sessions of a conference, ordered by date and start time.
    pub async fn conference_sessions(&self, conference_key: &str) -> Result<Vec<Session>, SessionError> {
        let conference = self.resolve_conference(conference_key).await?;
        self.execute(planner::plan(conference.id, Vec::new())).await
    }

    /// Sessions of a conference with the given type.
    pub async fn sessions_by_type(
        &self,
        conference_key: &str,
        session_type: SessionType,
    ) -> Result<Vec<Session>, SessionError> {
        let conference = self.resolve_conference(conference_key).await?;
        self.execute(planner::plan(
            conference.id,
            vec![Constraint::TypeIs(session_type)],
        ))
        .await
    }

    /// Sessions presented by a speaker, across all conferences.
    pub async fn sessions_by_speaker(&self, email: &str) -> Result<Vec<Session>, SessionError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(SessionError::InvalidArgument(
                "speaker email is required".to_string(),
            ));
        }
        self.sessions
            .find(&SessionQuery::default().with_speaker(email))
            .await
            .map_err(storage_err)
    }

    /// Sessions starting before 19:00 that are not workshops.
    pub async fn non_workshop_before_seven(
        &self,
        conference_key: &str,
    ) -> Result<Vec<Session>, SessionError> {
        self.sessions_in_window(conference_key, EVENING_CUTOFF, None, Some(SessionType::Workshop))
            .await
    }

    /// Sessions starting in `[after, before)`, optionally excluding a type.
    pub async fn sessions_in_window(
        &self,
        conference_key: &str,
        before: &str,
        after: Option<&str>,
        excluded: Option<SessionType>,
    ) -> Result<Vec<Session>, SessionError> {
        let conference_id = parse_key(conference_key)?;
        let plan = planner::plan_time_window(conference_id, before, after, excluded)?;
        self.ensure_conference(conference_key, &conference_id).await?;
        self.execute(plan).await
    }

    /// Sessions strictly shorter than `max_minutes`.
    pub async fn sessions_by_duration(
        &self,
        conference_key: &str,
        max_minutes: i64,
    ) -> Result<Vec<Session>, SessionError> {
        let conference_id = parse_key(conference_key)?;
        let plan = planner::plan_duration_under(conference_id, max_minutes)?;
        self.ensure_conference(conference_key, &conference_id).await?;
        self.execute(plan).await
    }

    /// The featured speaker message for a conference.
    ///
    /// Walking the sessions in order, the featured speaker is the last one
    /// seen for a second time. Empty when no speaker has two sessions.
    pub async fn featured_speaker(&self, conference_key: &str) -> Result<String, SessionError> {
        let sessions = self.conference_sessions(conference_key).await?;

        let mut seen = HashSet::new();
        let mut featured: Option<&str> = None;
        for session in &sessions {
            for speaker in &session.speakers {
                if !seen.insert(speaker.as_str()) {
                    featured = Some(speaker.as_str());
                }
            }
        }
        let Some(featured) = featured else {
            return Ok(String::new());
        };

        let names: Vec<&str> = sessions
            .iter()
            .filter(|s| s.speakers.iter().any(|sp| sp == featured))
            .map(|s| s.name.as_str())
            .collect();

        let display = self
            .speakers
            .get(featured)
            .await
            .map_err(storage_err)?
            .map(|s| s.name)
            .unwrap_or_else(|| featured.to_string());

        Ok(format!("{display}{FEATURED_SPEAKER_SUFFIX}{}", names.join(", ")))
    }

    async fn execute(&self, plan: SessionPlan) -> Result<Vec<Session>, SessionError> {
        debug!(
            range = ?plan.query.range,
            session_type = ?plan.query.session_type,
            residual = plan.residual.constraints().len(),
            "running session query"
        );
        let candidates = self.sessions.find(&plan.query).await.map_err(storage_err)?;
        let total = candidates.len();
        let kept = residual::apply(candidates, &plan.residual);
        debug!(candidates = total, kept = kept.len(), "residual filter applied");
        Ok(kept)
    }

    async fn resolve_conference(&self, key: &str) -> Result<Conference, SessionError> {
        let id = parse_key(key)?;
        self.conferences
            .get_by_id(&id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| SessionError::ConferenceNotFound(key.to_string()))
    }

    async fn ensure_conference(&self, key: &str, id: &ConferenceId) -> Result<(), SessionError> {
        match self.conferences.get_by_id(id).await.map_err(storage_err)? {
            Some(_) => Ok(()),
            None => Err(SessionError::ConferenceNotFound(key.to_string())),
        }
    }

    /// Normalize and de-duplicate speaker keys, rejecting unknown speakers.
    async fn check_speakers(&self, emails: &[String]) -> Result<Vec<String>, SessionError> {
        let mut keys: Vec<String> = Vec::with_capacity(emails.len());
        for email in emails {
            let key = normalize_email(email);
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        if keys.is_empty() {
            return Ok(keys);
        }

        let known = self.speakers.get_many(&keys).await.map_err(storage_err)?;
        if let Some(missing) = keys.iter().find(|k| !known.iter().any(|s| &s.email == *k)) {
            return Err(SessionError::InvalidArgument(format!(
                "unknown speaker: {missing}"
            )));
        }
        Ok(keys)
    }
}

fn parse_key(key: &str) -> Result<ConferenceId, SessionError> {
    key.parse()
        .map_err(|_| SessionError::ConferenceNotFound(key.to_string()))
}
