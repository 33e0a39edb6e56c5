//! Conference service.
//!
//! Conference lifecycle, filtered queries, registration and the "nearly sold
//! out" announcement. Registration goes through the profile repository,
//! which adjusts seats and the attendee list in one transaction.

use std::collections::HashMap;

use chrono::NaiveDate;
use confcentral_types::conference::{
    Conference, ConferenceId, ConferenceQueryForm, ConferenceView, CreateConferenceRequest,
    DEFAULT_CITY, DEFAULT_TOPICS, UpdateConferenceRequest, month_of, parse_calendar_date,
};
use confcentral_types::error::{ConferenceError, RepositoryError};
use confcentral_types::profile::Caller;
use tracing::{debug, info};

use crate::query::conference::plan_conference_query;
use crate::repository::conference::ConferenceRepository;
use crate::repository::profile::ProfileRepository;
use crate::service::profile::ensure_profile;

const ANNOUNCEMENT_PREFIX: &str =
    "Last chance to attend! The following conferences are nearly sold out: ";

fn storage_err(e: RepositoryError) -> ConferenceError {
    ConferenceError::StorageError(e.to_string())
}

/// Resolve a conference key. Keys that do not parse cannot name a
/// conference and are reported as not found.
pub fn parse_conference_key(key: &str) -> Result<ConferenceId, ConferenceError> {
    key.parse()
        .map_err(|_| ConferenceError::NotFound(key.to_string()))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ConferenceError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(parse_calendar_date)
        .transpose()
        .map_err(ConferenceError::InvalidArgument)
}

fn check_date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ConferenceError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ConferenceError::InvalidArgument(
            "end date must not be before start date".to_string(),
        )),
        _ => Ok(()),
    }
}

fn clean_topics(topics: Option<Vec<String>>) -> Option<Vec<String>> {
    topics
        .map(|t| {
            t.into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|t| !t.is_empty())
}

/// Service for conference lifecycle, queries and registration.
pub struct ConferenceService<C: ConferenceRepository, P: ProfileRepository> {
    conferences: C,
    profiles: P,
    nearly_sold_out_seats: i64,
}

impl<C: ConferenceRepository, P: ProfileRepository> ConferenceService<C, P> {
    /// - `nearly_sold_out_seats`: a conference with this many seats or fewer
    ///   left (but at least one) is listed in the announcement
    pub fn new(conferences: C, profiles: P, nearly_sold_out_seats: i64) -> Self {
        Self {
            conferences,
            profiles,
            nearly_sold_out_seats,
        }
    }

    /// Create a conference organised by the caller.
    ///
    /// Missing city and topics get defaults; seats start at `max_attendees`.
    pub async fn create_conference(
        &self,
        caller: &Caller,
        request: CreateConferenceRequest,
    ) -> Result<ConferenceView, ConferenceError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ConferenceError::InvalidArgument(
                "Conference 'name' field required".to_string(),
            ));
        }

        let start_date = parse_optional_date(request.start_date.as_deref())?;
        let end_date = parse_optional_date(request.end_date.as_deref())?;
        check_date_order(start_date, end_date)?;

        let max_attendees = request.max_attendees.unwrap_or(0);
        if max_attendees < 0 {
            return Err(ConferenceError::InvalidArgument(
                "max attendees must not be negative".to_string(),
            ));
        }

        let profile = ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)?;

        let conference = Conference {
            id: ConferenceId::new(),
            name,
            description: request.description,
            organizer_user_id: caller.user_id.clone(),
            topics: clean_topics(request.topics)
                .unwrap_or_else(|| DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()),
            city: request
                .city
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            start_date,
            end_date,
            month: month_of(start_date),
            max_attendees,
            seats_available: max_attendees,
            created_at: chrono::Utc::now(),
        };

        let conference = self
            .conferences
            .create(&conference)
            .await
            .map_err(storage_err)?;
        info!(conference_id = %conference.id, organizer = %caller.user_id, "conference created");

        Ok(ConferenceView {
            conference,
            organizer_display_name: Some(profile.display_name),
        })
    }

    /// Apply a partial update. Only the organizer may update a conference.
    ///
    /// Changing `max_attendees` shifts `seats_available` by the same amount
    /// unless seats are set explicitly.
    pub async fn update_conference(
        &self,
        caller: &Caller,
        key: &str,
        request: UpdateConferenceRequest,
    ) -> Result<ConferenceView, ConferenceError> {
        let mut conference = self.load(key).await?;
        if conference.organizer_user_id != caller.user_id {
            return Err(ConferenceError::Forbidden(
                "Only the owner can update the conference.".to_string(),
            ));
        }

        if let Some(name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConferenceError::InvalidArgument(
                    "Conference 'name' field required".to_string(),
                ));
            }
            conference.name = name.to_string();
        }
        if let Some(description) = request.description {
            conference.description = Some(description);
        }
        if let Some(topics) = clean_topics(request.topics) {
            conference.topics = topics;
        }
        if let Some(city) = request.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
            conference.city = city;
        }
        if request.start_date.is_some() {
            conference.start_date = parse_optional_date(request.start_date.as_deref())?;
            conference.month = month_of(conference.start_date);
        }
        if request.end_date.is_some() {
            conference.end_date = parse_optional_date(request.end_date.as_deref())?;
        }
        check_date_order(conference.start_date, conference.end_date)?;

        if let Some(max_attendees) = request.max_attendees {
            if max_attendees < 0 {
                return Err(ConferenceError::InvalidArgument(
                    "max attendees must not be negative".to_string(),
                ));
            }
            let delta = max_attendees - conference.max_attendees;
            conference.max_attendees = max_attendees;
            conference.seats_available = (conference.seats_available + delta).max(0);
        }
        if let Some(seats) = request.seats_available {
            if seats < 0 {
                return Err(ConferenceError::InvalidArgument(
                    "seats available must not be negative".to_string(),
                ));
            }
            conference.seats_available = seats;
        }

        let conference = self
            .conferences
            .update(&conference)
            .await
            .map_err(storage_err)?;
        info!(conference_id = %conference.id, "conference updated");

        let mut views = self.with_display_names(vec![conference]).await?;
        views.pop().ok_or_else(|| ConferenceError::NotFound(key.to_string()))
    }

    /// Get a single conference with its organizer's display name.
    pub async fn get_conference(&self, key: &str) -> Result<ConferenceView, ConferenceError> {
        let conference = self.load(key).await?;
        let mut views = self.with_display_names(vec![conference]).await?;
        views.pop().ok_or_else(|| ConferenceError::NotFound(key.to_string()))
    }

    /// Delete a conference and everything it owns. Organizer only.
    pub async fn delete_conference(&self, caller: &Caller, key: &str) -> Result<(), ConferenceError> {
        let conference = self.load(key).await?;
        if conference.organizer_user_id != caller.user_id {
            return Err(ConferenceError::Forbidden(
                "Only the owner can delete the conference.".to_string(),
            ));
        }
        self.conferences
            .delete(&conference.id)
            .await
            .map_err(storage_err)?;
        info!(conference_id = %conference.id, "conference deleted");
        Ok(())
    }

    /// Conferences organised by the caller.
    pub async fn conferences_created(
        &self,
        caller: &Caller,
    ) -> Result<Vec<ConferenceView>, ConferenceError> {
        let conferences = self
            .conferences
            .list_by_organizer(&caller.user_id)
            .await
            .map_err(storage_err)?;
        self.with_display_names(conferences).await
    }

    /// Run user-supplied filters.
    pub async fn query_conferences(
        &self,
        forms: &[ConferenceQueryForm],
    ) -> Result<Vec<ConferenceView>, ConferenceError> {
        let query = plan_conference_query(forms)?;
        debug!(
            filters = query.filters.len(),
            inequality_field = ?query.inequality_field,
            "running conference query"
        );
        let conferences = self.conferences.query(&query).await.map_err(storage_err)?;
        self.with_display_names(conferences).await
    }

    /// Register the caller for a conference, taking one seat.
    pub async fn register(&self, caller: &Caller, key: &str) -> Result<(), ConferenceError> {
        let id = parse_conference_key(key)?;
        ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)?;

        self.profiles
            .register(&caller.user_id, &id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ConferenceError::NotFound(key.to_string()),
                RepositoryError::Conflict(msg) => ConferenceError::Conflict(msg),
                other => storage_err(other),
            })?;

        info!(conference_id = %id, user_id = %caller.user_id, "registered for conference");
        Ok(())
    }

    /// Unregister the caller, giving the seat back.
    ///
    /// Returns `false` when the caller was not registered.
    pub async fn unregister(&self, caller: &Caller, key: &str) -> Result<bool, ConferenceError> {
        let conference = self.load(key).await?;
        let removed = self
            .profiles
            .unregister(&caller.user_id, &conference.id)
            .await
            .map_err(storage_err)?;
        if removed {
            info!(conference_id = %conference.id, user_id = %caller.user_id, "unregistered from conference");
        }
        Ok(removed)
    }

    /// Conferences the caller is registered for, in registration order.
    pub async fn conferences_to_attend(
        &self,
        caller: &Caller,
    ) -> Result<Vec<ConferenceView>, ConferenceError> {
        let profile = ensure_profile(&self.profiles, caller)
            .await
            .map_err(storage_err)?;
        let conferences = self
            .conferences
            .get_many(&profile.conference_keys_to_attend)
            .await
            .map_err(storage_err)?;
        self.with_display_names(conferences).await
    }

    /// The "nearly sold out" announcement, or an empty string when no
    /// conference qualifies.
    pub async fn announcement(&self) -> Result<String, ConferenceError> {
        let conferences = self
            .conferences
            .list_nearly_sold_out(self.nearly_sold_out_seats)
            .await
            .map_err(storage_err)?;
        if conferences.is_empty() {
            return Ok(String::new());
        }
        let names: Vec<&str> = conferences.iter().map(|c| c.name.as_str()).collect();
        Ok(format!("{ANNOUNCEMENT_PREFIX}{}", names.join(", ")))
    }

    async fn load(&self, key: &str) -> Result<Conference, ConferenceError> {
        let id = parse_conference_key(key)?;
        self.conferences
            .get_by_id(&id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| ConferenceError::NotFound(key.to_string()))
    }

    async fn with_display_names(
        &self,
        conferences: Vec<Conference>,
    ) -> Result<Vec<ConferenceView>, ConferenceError> {
        let mut organizers: Vec<String> = conferences
            .iter()
            .map(|c| c.organizer_user_id.clone())
            .collect();
        organizers.sort();
        organizers.dedup();

        let names: HashMap<String, String> = if organizers.is_empty() {
            HashMap::new()
        } else {
            self.profiles
                .display_names(&organizers)
                .await
                .map_err(storage_err)?
        };

        Ok(conferences
            .into_iter()
            .map(|conference| {
                let organizer_display_name = names.get(&conference.organizer_user_id).cloned();
                ConferenceView {
                    conference,
                    organizer_display_name,
                }
            })
            .collect())
    }
}
