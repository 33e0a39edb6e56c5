//! SQLite session repository implementation.
//!
//! `find` translates a [`SessionQuery`] into a single SELECT: equality
//! filters on conference, type and speaker, plus at most one range filter.
//! Results are ordered by the range column first, then by date, start time
//! and insertion order.

use std::collections::HashMap;

use confcentral_core::repository::session::{
    RangeFilter, SessionField, SessionQuery, SessionRepository,
};
use confcentral_types::conference::ConferenceId;
use confcentral_types::error::RepositoryError;
use confcentral_types::session::{Session, SessionId, SessionType};
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;
use super::{
    format_date, format_datetime, format_time, parse_date, parse_json_list, parse_time,
    query_err, to_json_list,
};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SessionRow {
    id: String,
    conference_id: String,
    name: String,
    speakers: String,
    highlights: String,
    date: String,
    start_time: String,
    duration: i64,
    session_type: String,
    location: Option<String>,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conference_id: row.try_get("conference_id")?,
            name: row.try_get("name")?,
            speakers: row.try_get("speakers")?,
            highlights: row.try_get("highlights")?,
            date: row.try_get("date")?,
            start_time: row.try_get("start_time")?,
            duration: row.try_get("duration")?,
            session_type: row.try_get("session_type")?,
            location: row.try_get("location")?,
        })
    }

    fn into_session(self) -> Result<Session, RepositoryError> {
        let id = self
            .id
            .parse::<SessionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))?;
        let conference_id = self
            .conference_id
            .parse::<ConferenceId>()
            .map_err(|e| RepositoryError::Query(format!("invalid conference id: {e}")))?;
        let session_type: SessionType = self
            .session_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Session {
            id,
            conference_id,
            name: self.name,
            speakers: parse_json_list(&self.speakers, "speakers")?,
            highlights: parse_json_list(&self.highlights, "highlights")?,
            date: parse_date(&self.date)?,
            start_time: parse_time(&self.start_time)?,
            duration: self.duration,
            session_type,
            location: self.location,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Session>, RepositoryError> {
    let mut sessions = Vec::with_capacity(rows.len());
    for row in rows {
        let session_row = SessionRow::from_row(row).map_err(query_err)?;
        sessions.push(session_row.into_session()?);
    }
    Ok(sessions)
}

fn column(field: SessionField) -> &'static str {
    match field {
        SessionField::Date => "date",
        SessionField::StartTime => "start_time",
        SessionField::Duration => "duration",
    }
}

fn push_range(qb: &mut QueryBuilder<'_, Sqlite>, range: &RangeFilter) {
    qb.push(format!(
        " AND {} {} ",
        column(range.field()),
        range.bound().symbol()
    ));
    match range {
        RangeFilter::Date(_, date) => qb.push_bind(format_date(date)),
        RangeFilter::StartTime(_, time) => qb.push_bind(format_time(time)),
        RangeFilter::Duration(_, minutes) => qb.push_bind(*minutes),
    };
}

impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &Session) -> Result<Session, RepositoryError> {
        sqlx::query(
            "INSERT INTO sessions (id, conference_id, name, speakers, highlights, date, start_time, duration, session_type, location, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(session.id.to_string())
        .bind(session.conference_id.to_string())
        .bind(&session.name)
        .bind(to_json_list(&session.speakers)?)
        .bind(to_json_list(&session.highlights)?)
        .bind(format_date(&session.date))
        .bind(format_time(&session.start_time))
        .bind(session.duration)
        .bind(session.session_type.to_string())
        .bind(&session.location)
        .bind(format_datetime(&chrono::Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.message().contains("FOREIGN KEY") {
                    return RepositoryError::NotFound;
                }
            }
            query_err(e)
        })?;

        Ok(session.clone())
    }

    async fn get_by_id(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let session_row = SessionRow::from_row(&row).map_err(query_err)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn get_many(&self, ids: &[SessionId]) -> Result<Vec<Session>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM sessions WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let mut by_id: HashMap<SessionId, Session> =
            map_rows(&rows)?.into_iter().map(|s| (s.id, s)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn find(&self, query: &SessionQuery) -> Result<Vec<Session>, RepositoryError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM sessions WHERE 1 = 1");

        if let Some(conference_id) = &query.conference_id {
            qb.push(" AND conference_id = ")
                .push_bind(conference_id.to_string());
        }
        if let Some(session_type) = &query.session_type {
            qb.push(" AND session_type = ")
                .push_bind(session_type.to_string());
        }
        if let Some(speaker) = &query.speaker {
            qb.push(" AND EXISTS (SELECT 1 FROM json_each(sessions.speakers) WHERE json_each.value = ")
                .push_bind(speaker.clone())
                .push(")");
        }
        if let Some(range) = &query.range {
            push_range(&mut qb, range);
        }

        qb.push(" ORDER BY ");
        if let Some(range) = &query.range {
            qb.push(column(range.field())).push(", ");
        }
        qb.push("date, start_time, rowid");

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        map_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::conference::SqliteConferenceRepository;
    use crate::sqlite::test_support::test_pool;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use confcentral_core::query::{planner, residual};
    use confcentral_core::repository::conference::ConferenceRepository;
    use confcentral_core::repository::speaker::SpeakerRepository;
    use confcentral_types::conference::Conference;
    use confcentral_types::speaker::Speaker;

    use crate::sqlite::speaker::SqliteSpeakerRepository;

    async fn setup_conference(pool: &DatabasePool) -> ConferenceId {
        let conference = Conference {
            id: ConferenceId::new(),
            name: "RustConf".to_string(),
            description: None,
            organizer_user_id: "org@example.com".to_string(),
            topics: vec![],
            city: "Portland".to_string(),
            start_date: None,
            end_date: None,
            month: 0,
            max_attendees: 10,
            seats_available: 10,
            created_at: Utc::now(),
        };
        SqliteConferenceRepository::new(pool.clone())
            .create(&conference)
            .await
            .unwrap();
        conference.id
    }

    fn make_session(
        conference_id: ConferenceId,
        session_type: SessionType,
        time: &str,
        duration: i64,
    ) -> Session {
        Session {
            id: SessionId::new(),
            conference_id,
            name: format!("{session_type} {time}"),
            speakers: vec!["ann@example.com".to_string()],
            highlights: vec!["intro".to_string()],
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            duration,
            session_type,
            location: Some("Hall A".to_string()),
        }
    }

    async fn seed(repo: &SqliteSessionRepository, conference_id: ConferenceId) {
        for (kind, time, duration) in [
            (SessionType::Keynote, "09:00", 30),
            (SessionType::Workshop, "14:00", 90),
            (SessionType::Lecture, "18:30", 45),
            (SessionType::Lecture, "20:00", 120),
        ] {
            repo.create(&make_session(conference_id, kind, time, duration))
                .await
                .unwrap();
        }
    }

    fn labels(sessions: &[Session]) -> Vec<String> {
        sessions.iter().map(|s| s.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool);

        let session = make_session(conference_id, SessionType::Panel, "11:15", 50);
        repo.create(&session).await.unwrap();

        let fetched = repo.get_by_id(&session.id).await.unwrap().unwrap();
        assert_eq!(fetched, session);
        assert!(repo.get_by_id(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_requires_conference() {
        let repo = SqliteSessionRepository::new(test_pool().await);
        let session = make_session(ConferenceId::new(), SessionType::Panel, "11:15", 50);
        assert!(repo.create(&session).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_start_time_then_residual() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool);
        seed(&repo, conference_id).await;

        let plan = planner::plan_before_excluding(
            conference_id,
            planner::EVENING_CUTOFF,
            SessionType::Workshop,
        )
        .unwrap();

        let candidates = repo.find(&plan.query).await.unwrap();
        assert_eq!(
            labels(&candidates),
            vec!["keynote 09:00", "workshop 14:00", "lecture 18:30"]
        );

        let kept = residual::apply(candidates, &plan.residual);
        assert_eq!(labels(&kept), vec!["keynote 09:00", "lecture 18:30"]);
    }

    #[tokio::test]
    async fn test_find_by_duration_orders_by_duration() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool);
        seed(&repo, conference_id).await;

        let query = SessionQuery::in_conference(conference_id).with_range(RangeFilter::shorter_than(60));
        let found = repo.find(&query).await.unwrap();
        let durations: Vec<i64> = found.iter().map(|s| s.duration).collect();
        assert_eq!(durations, vec![30, 45]);

        let query = SessionQuery::in_conference(conference_id).with_range(RangeFilter::shorter_than(30));
        assert!(repo.find(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_type_and_speaker() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool.clone());
        seed(&repo, conference_id).await;

        let mut solo = make_session(conference_id, SessionType::Lecture, "08:00", 20);
        solo.speakers = vec!["bob@example.com".to_string()];
        repo.create(&solo).await.unwrap();

        let lectures = repo
            .find(&SessionQuery::in_conference(conference_id).with_type(SessionType::Lecture))
            .await
            .unwrap();
        assert_eq!(
            labels(&lectures),
            vec!["lecture 08:00", "lecture 18:30", "lecture 20:00"]
        );

        let bob = repo
            .find(&SessionQuery::default().with_speaker("bob@example.com"))
            .await
            .unwrap();
        assert_eq!(labels(&bob), vec!["lecture 08:00"]);

        // Scoped to conference: nothing leaks across conferences.
        let other = setup_conference(&pool).await;
        assert!(repo
            .find(&SessionQuery::in_conference(other))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_get_many_and_cascade_delete() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool.clone());
        let a = make_session(conference_id, SessionType::Keynote, "09:00", 30);
        let b = make_session(conference_id, SessionType::Lecture, "10:00", 30);
        repo.create(&a).await.unwrap();
        repo.create(&b).await.unwrap();

        let found = repo.get_many(&[b.id, a.id]).await.unwrap();
        assert_eq!(labels(&found), vec!["lecture 10:00", "keynote 09:00"]);

        SqliteConferenceRepository::new(pool)
            .delete(&conference_id)
            .await
            .unwrap();
        assert!(repo.get_by_id(&a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_start_time_keeps_seconds() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool);

        let mut session = make_session(conference_id, SessionType::Panel, "09:30", 50);
        session.start_time = NaiveTime::from_hms_opt(9, 30, 15).unwrap();
        repo.create(&session).await.unwrap();

        let fetched = repo.get_by_id(&session.id).await.unwrap().unwrap();
        assert_eq!(fetched.start_time, session.start_time);
    }

    #[tokio::test]
    async fn test_start_time_bound_with_seconds_matches_in_memory_filter() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let repo = SqliteSessionRepository::new(pool);
        let lecture = make_session(conference_id, SessionType::Lecture, "18:30", 45);
        repo.create(&lecture).await.unwrap();

        let plan = planner::plan_time_window(conference_id, "18:30:30", None, None).unwrap();
        let Some(range) = plan.query.range else {
            panic!("window end should be pushed to the store");
        };
        assert!(range.matches(&lecture));

        let found = repo.find(&plan.query).await.unwrap();
        assert_eq!(labels(&found), vec!["lecture 18:30"]);

        let plan = planner::plan_time_window(conference_id, "18:30:00", None, None).unwrap();
        assert!(repo.find(&plan.query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_speaker_leaves_sessions_intact() {
        let pool = test_pool().await;
        let conference_id = setup_conference(&pool).await;
        let sessions = SqliteSessionRepository::new(pool.clone());
        let speakers = SqliteSpeakerRepository::new(pool);

        speakers
            .create(&Speaker {
                email: "ann@example.com".to_string(),
                name: "Ann".to_string(),
                biography: None,
                company: None,
            })
            .await
            .unwrap();
        let session = make_session(conference_id, SessionType::Keynote, "09:00", 30);
        sessions.create(&session).await.unwrap();

        speakers.delete("ann@example.com").await.unwrap();

        let fetched = sessions.get_by_id(&session.id).await.unwrap().unwrap();
        assert_eq!(fetched.speakers, vec!["ann@example.com".to_string()]);

        let by_speaker = sessions
            .find(&SessionQuery::default().with_speaker("ann@example.com"))
            .await
            .unwrap();
        assert_eq!(labels(&by_speaker), vec!["keynote 09:00"]);
    }
}
