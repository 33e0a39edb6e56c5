//! In-memory repositories for service tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use confcentral_types::conference::{
    Conference, ConferenceField, ConferenceId, Operator, month_of,
};
use confcentral_types::error::RepositoryError;
use confcentral_types::profile::{Caller, Profile};
use confcentral_types::session::{Session, SessionId, SessionType, parse_time_of_day};
use confcentral_types::speaker::Speaker;

use crate::repository::conference::{ConferenceQuery, ConferenceRepository, FilterValue};
use crate::repository::profile::ProfileRepository;
use crate::repository::session::{SessionField, SessionQuery, SessionRepository};
use crate::repository::speaker::SpeakerRepository;

pub fn caller(email: &str) -> Caller {
    let nickname = email.split('@').next().unwrap_or(email).to_string();
    Caller {
        user_id: email.to_string(),
        email: email.to_string(),
        nickname,
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn sample_conference(organizer: &str, name: &str, max_attendees: i64) -> Conference {
    let start = Some(date("2024-06-01"));
    Conference {
        id: ConferenceId::new(),
        name: name.to_string(),
        description: None,
        organizer_user_id: organizer.to_string(),
        topics: vec!["Rust".to_string()],
        city: "London".to_string(),
        start_date: start,
        end_date: Some(date("2024-06-03")),
        month: month_of(start),
        max_attendees,
        seats_available: max_attendees,
        created_at: Utc::now(),
    }
}

pub fn sample_session(
    conference_id: ConferenceId,
    name: &str,
    session_type: SessionType,
    start_time: &str,
    duration: i64,
) -> Session {
    Session {
        id: SessionId::new(),
        conference_id,
        name: name.to_string(),
        speakers: vec![],
        highlights: vec![],
        date: date("2024-06-01"),
        start_time: parse_time_of_day(start_time).unwrap(),
        duration,
        session_type,
        location: None,
    }
}

#[derive(Clone, Default)]
pub struct MemoryConferences {
    rows: Arc<Mutex<Vec<Conference>>>,
}

impl MemoryConferences {
    pub fn insert(&self, conference: Conference) -> Conference {
        self.rows.lock().unwrap().push(conference.clone());
        conference
    }

    pub fn seats(&self, id: &ConferenceId) -> Option<i64> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *id)
            .map(|c| c.seats_available)
    }

    fn with_mut<T>(&self, id: &ConferenceId, f: impl FnOnce(&mut Conference) -> T) -> Option<T> {
        self.rows.lock().unwrap().iter_mut().find(|c| c.id == *id).map(f)
    }
}

fn conference_matches(conference: &Conference, query: &ConferenceQuery) -> bool {
    query.filters.iter().all(|filter| {
        let ordering = match (filter.field, &filter.value) {
            (ConferenceField::City, FilterValue::Text(v)) => conference.city.as_str().cmp(v.as_str()),
            (ConferenceField::Topic, FilterValue::Text(v)) => {
                return conference.topics.iter().any(|t| t == v);
            }
            (ConferenceField::Month, FilterValue::Integer(v)) => i64::from(conference.month).cmp(v),
            (ConferenceField::MaxAttendees, FilterValue::Integer(v)) => {
                conference.max_attendees.cmp(v)
            }
            _ => return false,
        };
        match filter.operator {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gteq => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lteq => ordering != Ordering::Greater,
        }
    })
}

impl ConferenceRepository for MemoryConferences {
    async fn create(&self, conference: &Conference) -> Result<Conference, RepositoryError> {
        Ok(self.insert(conference.clone()))
    }

    async fn get_by_id(&self, id: &ConferenceId) -> Result<Option<Conference>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == *id).cloned())
    }

    async fn get_many(&self, ids: &[ConferenceId]) -> Result<Vec<Conference>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| rows.iter().find(|c| c.id == *id).cloned())
            .collect())
    }

    async fn update(&self, conference: &Conference) -> Result<Conference, RepositoryError> {
        self.with_mut(&conference.id, |c| *c = conference.clone())
            .ok_or(RepositoryError::NotFound)?;
        Ok(conference.clone())
    }

    async fn delete(&self, id: &ConferenceId) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().retain(|c| c.id != *id);
        Ok(())
    }

    async fn list_by_organizer(&self, user_id: &str) -> Result<Vec<Conference>, RepositoryError> {
        let mut found: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.organizer_user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn query(&self, query: &ConferenceQuery) -> Result<Vec<Conference>, RepositoryError> {
        let mut found: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| conference_matches(c, query))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn list_nearly_sold_out(&self, max_seats: i64) -> Result<Vec<Conference>, RepositoryError> {
        let mut found: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.seats_available > 0 && c.seats_available <= max_seats)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}

#[derive(Clone, Default)]
pub struct MemorySessions {
    rows: Arc<Mutex<Vec<Session>>>,
}

impl MemorySessions {
    pub fn insert(&self, session: Session) -> Session {
        self.rows.lock().unwrap().push(session.clone());
        session
    }

    fn contains(&self, id: &SessionId) -> bool {
        self.rows.lock().unwrap().iter().any(|s| s.id == *id)
    }
}

impl SessionRepository for MemorySessions {
    async fn create(&self, session: &Session) -> Result<Session, RepositoryError> {
        Ok(self.insert(session.clone()))
    }

    async fn get_by_id(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == *id).cloned())
    }

    async fn get_many(&self, ids: &[SessionId]) -> Result<Vec<Session>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| rows.iter().find(|s| s.id == *id).cloned())
            .collect())
    }

    async fn find(&self, query: &SessionQuery) -> Result<Vec<Session>, RepositoryError> {
        let mut found: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        // Stable sort keeps insertion order as the final tie-breaker.
        found.sort_by(|a, b| {
            let by_range = match query.range.map(|r| r.field()) {
                Some(SessionField::StartTime) => a.start_time.cmp(&b.start_time),
                Some(SessionField::Duration) => a.duration.cmp(&b.duration),
                Some(SessionField::Date) => a.date.cmp(&b.date),
                None => Ordering::Equal,
            };
            by_range
                .then(a.date.cmp(&b.date))
                .then(a.start_time.cmp(&b.start_time))
        });
        Ok(found)
    }
}

#[derive(Clone, Default)]
pub struct MemorySpeakers {
    rows: Arc<Mutex<Vec<Speaker>>>,
}

impl MemorySpeakers {
    pub fn insert(&self, email: &str, name: &str) -> Speaker {
        let speaker = Speaker {
            email: email.to_string(),
            name: name.to_string(),
            biography: None,
            company: None,
        };
        self.rows.lock().unwrap().push(speaker.clone());
        speaker
    }
}

impl SpeakerRepository for MemorySpeakers {
    async fn create(&self, speaker: &Speaker) -> Result<Speaker, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|s| s.email == speaker.email) {
            return Err(RepositoryError::Conflict(speaker.email.clone()));
        }
        rows.push(speaker.clone());
        Ok(speaker.clone())
    }

    async fn get(&self, email: &str) -> Result<Option<Speaker>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.email == email).cloned())
    }

    async fn get_many(&self, emails: &[String]) -> Result<Vec<Speaker>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(emails
            .iter()
            .filter_map(|e| rows.iter().find(|s| s.email == *e).cloned())
            .collect())
    }

    async fn list(&self) -> Result<Vec<Speaker>, RepositoryError> {
        let mut all = self.rows.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn delete(&self, email: &str) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.email != email);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Profiles plus registrations. Registration touches seat counts, so the
/// store can share a conference store.
#[derive(Clone, Default)]
pub struct MemoryProfiles {
    rows: Arc<Mutex<HashMap<String, Profile>>>,
    conferences: MemoryConferences,
    sessions: Option<MemorySessions>,
}

impl MemoryProfiles {
    pub fn with_conferences(conferences: MemoryConferences) -> Self {
        Self {
            conferences,
            ..Self::default()
        }
    }

    /// Wishlist inserts fail with `NotFound` for sessions missing from
    /// `sessions`, like the foreign key in the SQLite store.
    pub fn with_sessions(sessions: MemorySessions) -> Self {
        Self {
            sessions: Some(sessions),
            ..Self::default()
        }
    }
}

impl ProfileRepository for MemoryProfiles {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.rows.lock().unwrap().get(user_id).cloned())
    }

    async fn save(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let entry = rows
            .entry(profile.user_id.clone())
            .or_insert_with(|| profile.clone());
        entry.display_name = profile.display_name.clone();
        entry.main_email = profile.main_email.clone();
        entry.tee_shirt_size = profile.tee_shirt_size;
        Ok(entry.clone())
    }

    async fn display_names(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, String>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|id| rows.get(id).map(|p| (id.clone(), p.display_name.clone())))
            .collect())
    }

    async fn register(
        &self,
        user_id: &str,
        conference_id: &ConferenceId,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let profile = rows.get_mut(user_id).ok_or(RepositoryError::NotFound)?;
        if profile.conference_keys_to_attend.contains(conference_id) {
            return Err(RepositoryError::Conflict("already registered".to_string()));
        }
        self.conferences
            .with_mut(conference_id, |c| {
                if c.seats_available <= 0 {
                    return Err(RepositoryError::Conflict("no seats available".to_string()));
                }
                c.seats_available -= 1;
                Ok(())
            })
            .ok_or(RepositoryError::NotFound)??;
        profile.conference_keys_to_attend.push(*conference_id);
        Ok(())
    }

    async fn unregister(
        &self,
        user_id: &str,
        conference_id: &ConferenceId,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(profile) = rows.get_mut(user_id) else {
            return Ok(false);
        };
        let before = profile.conference_keys_to_attend.len();
        profile.conference_keys_to_attend.retain(|c| c != conference_id);
        if profile.conference_keys_to_attend.len() == before {
            return Ok(false);
        }
        self.conferences
            .with_mut(conference_id, |c| c.seats_available += 1);
        Ok(true)
    }

    async fn add_to_wishlist(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<(), RepositoryError> {
        if let Some(sessions) = &self.sessions {
            if !sessions.contains(session_id) {
                return Err(RepositoryError::NotFound);
            }
        }
        let mut rows = self.rows.lock().unwrap();
        let profile = rows.get_mut(user_id).ok_or(RepositoryError::NotFound)?;
        if profile.session_wishlist.contains(session_id) {
            return Err(RepositoryError::Conflict("already in wishlist".to_string()));
        }
        profile.session_wishlist.push(*session_id);
        Ok(())
    }

    async fn remove_from_wishlist(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(profile) = rows.get_mut(user_id) else {
            return Ok(false);
        };
        let before = profile.session_wishlist.len();
        profile.session_wishlist.retain(|s| s != session_id);
        Ok(profile.session_wishlist.len() != before)
    }
}
