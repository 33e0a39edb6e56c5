//! SQLite conference repository implementation.
//!
//! Implements `ConferenceRepository` from `confcentral-core` using sqlx with
//! split read/write pools. Topics are stored as a JSON array and matched
//! with `json_each`.

use std::collections::HashMap;

use confcentral_core::repository::conference::{
    ConferenceFilter, ConferenceQuery, ConferenceRepository, FilterValue,
};
use confcentral_types::conference::{Conference, ConferenceField, ConferenceId};
use confcentral_types::error::RepositoryError;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;
use super::{
    format_date, format_datetime, parse_date, parse_datetime, parse_json_list, query_err,
    to_json_list,
};

/// SQLite-backed implementation of `ConferenceRepository`.
pub struct SqliteConferenceRepository {
    pool: DatabasePool,
}

impl SqliteConferenceRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Conference.
struct ConferenceRow {
    id: String,
    name: String,
    description: Option<String>,
    organizer_user_id: String,
    topics: String,
    city: String,
    start_date: Option<String>,
    end_date: Option<String>,
    month: i64,
    max_attendees: i64,
    seats_available: i64,
    created_at: String,
}

impl ConferenceRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            organizer_user_id: row.try_get("organizer_user_id")?,
            topics: row.try_get("topics")?,
            city: row.try_get("city")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            month: row.try_get("month")?,
            max_attendees: row.try_get("max_attendees")?,
            seats_available: row.try_get("seats_available")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conference(self) -> Result<Conference, RepositoryError> {
        let id = self
            .id
            .parse::<ConferenceId>()
            .map_err(|e| RepositoryError::Query(format!("invalid conference id: {e}")))?;

        Ok(Conference {
            id,
            name: self.name,
            description: self.description,
            organizer_user_id: self.organizer_user_id,
            topics: parse_json_list(&self.topics, "topics")?,
            city: self.city,
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            month: u32::try_from(self.month)
                .map_err(|e| RepositoryError::Query(format!("invalid month: {e}")))?,
            max_attendees: self.max_attendees,
            seats_available: self.seats_available,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Conference>, RepositoryError> {
    let mut conferences = Vec::with_capacity(rows.len());
    for row in rows {
        let conf_row = ConferenceRow::from_row(row).map_err(query_err)?;
        conferences.push(conf_row.into_conference()?);
    }
    Ok(conferences)
}

fn column(field: ConferenceField) -> &'static str {
    match field {
        ConferenceField::City => "city",
        ConferenceField::Topic => "topics",
        ConferenceField::Month => "month",
        ConferenceField::MaxAttendees => "max_attendees",
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ConferenceFilter) {
    qb.push(" AND ");
    match (filter.field, &filter.value) {
        (ConferenceField::Topic, FilterValue::Text(topic)) => {
            qb.push("EXISTS (SELECT 1 FROM json_each(conferences.topics) WHERE json_each.value = ")
                .push_bind(topic.clone())
                .push(")");
        }
        (field, FilterValue::Text(text)) => {
            qb.push(format!("{} {} ", column(field), filter.operator.symbol()))
                .push_bind(text.clone());
        }
        (field, FilterValue::Integer(n)) => {
            qb.push(format!("{} {} ", column(field), filter.operator.symbol()))
                .push_bind(*n);
        }
    }
}

impl ConferenceRepository for SqliteConferenceRepository {
    async fn create(&self, conference: &Conference) -> Result<Conference, RepositoryError> {
        sqlx::query(
            "INSERT INTO conferences (id, name, description, organizer_user_id, topics, city, start_date, end_date, month, max_attendees, seats_available, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(conference.id.to_string())
        .bind(&conference.name)
        .bind(&conference.description)
        .bind(&conference.organizer_user_id)
        .bind(to_json_list(&conference.topics)?)
        .bind(&conference.city)
        .bind(conference.start_date.as_ref().map(format_date))
        .bind(conference.end_date.as_ref().map(format_date))
        .bind(i64::from(conference.month))
        .bind(conference.max_attendees)
        .bind(conference.seats_available)
        .bind(format_datetime(&conference.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if super::is_unique_violation(&e) {
                RepositoryError::Conflict(format!("conference '{}' already exists", conference.id))
            } else {
                query_err(e)
            }
        })?;

        Ok(conference.clone())
    }

    async fn get_by_id(&self, id: &ConferenceId) -> Result<Option<Conference>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conferences WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let conf_row = ConferenceRow::from_row(&row).map_err(query_err)?;
                Ok(Some(conf_row.into_conference()?))
            }
            None => Ok(None),
        }
    }

    async fn get_many(&self, ids: &[ConferenceId]) -> Result<Vec<Conference>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM conferences WHERE id IN (");
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

        let mut by_id: HashMap<ConferenceId, Conference> = map_rows(&rows)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn update(&self, conference: &Conference) -> Result<Conference, RepositoryError> {
        let result = sqlx::query(
            "UPDATE conferences SET name = ?, description = ?, topics = ?, city = ?, start_date = ?, end_date = ?, month = ?, max_attendees = ?, seats_available = ?
             WHERE id = ?",
        )
        .bind(&conference.name)
        .bind(&conference.description)
        .bind(to_json_list(&conference.topics)?)
        .bind(&conference.city)
        .bind(conference.start_date.as_ref().map(format_date))
        .bind(conference.end_date.as_ref().map(format_date))
        .bind(i64::from(conference.month))
        .bind(conference.max_attendees)
        .bind(conference.seats_available)
        .bind(conference.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(conference.clone())
    }

    async fn delete(&self, id: &ConferenceId) -> Result<(), RepositoryError> {
        // Sessions, registrations and wishlist entries go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM conferences WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::debug!(conference_id = %id, "conference deleted");
        Ok(())
    }

    async fn list_by_organizer(&self, user_id: &str) -> Result<Vec<Conference>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM conferences WHERE organizer_user_id = ? ORDER BY name")
            .bind(user_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        map_rows(&rows)
    }

    async fn query(&self, query: &ConferenceQuery) -> Result<Vec<Conference>, RepositoryError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM conferences WHERE 1 = 1");
        for filter in &query.filters {
            push_filter(&mut qb, filter);
        }

        qb.push(" ORDER BY ");
        if let Some(field) = query.inequality_field {
            qb.push(column(field)).push(", ");
        }
        qb.push("name");

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        map_rows(&rows)
    }

    async fn list_nearly_sold_out(&self, max_seats: i64) -> Result<Vec<Conference>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conferences WHERE seats_available > 0 AND seats_available <= ? ORDER BY name",
        )
        .bind(max_seats)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;
        map_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::test_pool;
    use chrono::{NaiveDate, Utc};
    use confcentral_core::query::conference::plan_conference_query;
    use confcentral_types::conference::{ConferenceQueryForm, month_of};

    fn make_conference(name: &str, city: &str, month: u32, max_attendees: i64) -> Conference {
        let start = NaiveDate::from_ymd_opt(2024, month, 10);
        Conference {
            id: ConferenceId::new(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            organizer_user_id: "org@example.com".to_string(),
            topics: vec!["Rust".to_string(), "Systems".to_string()],
            city: city.to_string(),
            start_date: start,
            end_date: start,
            month: month_of(start),
            max_attendees,
            seats_available: max_attendees,
            created_at: Utc::now(),
        }
    }

    fn form(field: &str, operator: &str, value: &str) -> ConferenceQueryForm {
        ConferenceQueryForm {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    fn names(conferences: &[Conference]) -> Vec<&str> {
        conferences.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get_conference() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        let conf = make_conference("RustConf", "Portland", 9, 100);
        repo.create(&conf).await.unwrap();

        let fetched = repo.get_by_id(&conf.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "RustConf");
        assert_eq!(fetched.topics, conf.topics);
        assert_eq!(fetched.start_date, conf.start_date);
        assert_eq!(fetched.month, 9);
        assert_eq!(fetched.seats_available, 100);

        assert!(repo.get_by_id(&ConferenceId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_conference() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        let mut conf = make_conference("RustConf", "Portland", 9, 100);
        repo.create(&conf).await.unwrap();

        conf.city = "Montreal".to_string();
        conf.seats_available = 42;
        repo.update(&conf).await.unwrap();

        let fetched = repo.get_by_id(&conf.id).await.unwrap().unwrap();
        assert_eq!(fetched.city, "Montreal");
        assert_eq!(fetched.seats_available, 42);

        let missing = make_conference("Ghost", "Nowhere", 1, 1);
        assert!(matches!(
            repo.update(&missing).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_many_keeps_requested_order() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        let a = make_conference("A", "London", 1, 10);
        let b = make_conference("B", "London", 2, 10);
        repo.create(&a).await.unwrap();
        repo.create(&b).await.unwrap();

        let found = repo
            .get_many(&[b.id, ConferenceId::new(), a.id])
            .await
            .unwrap();
        assert_eq!(names(&found), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_query_orders_by_inequality_field_then_name() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        for conf in [
            make_conference("Zeta", "London", 6, 50),
            make_conference("Alpha", "London", 8, 500),
            make_conference("Beta", "Paris", 3, 200),
            make_conference("Gamma", "London", 6, 300),
        ] {
            repo.create(&conf).await.unwrap();
        }

        let query = plan_conference_query(&[
            form("CITY", "EQ", "London"),
            form("MONTH", "GTEQ", "6"),
        ])
        .unwrap();
        let found = repo.query(&query).await.unwrap();
        assert_eq!(names(&found), vec!["Gamma", "Zeta", "Alpha"]);

        let query = plan_conference_query(&[form("MAX_ATTENDEES", "GT", "100")]).unwrap();
        let found = repo.query(&query).await.unwrap();
        assert_eq!(names(&found), vec!["Beta", "Gamma", "Alpha"]);

        let query = plan_conference_query(&[form("CITY", "NE", "London")]).unwrap();
        assert_eq!(names(&repo.query(&query).await.unwrap()), vec!["Beta"]);

        let all = repo.query(&ConferenceQuery::default()).await.unwrap();
        assert_eq!(names(&all), vec!["Alpha", "Beta", "Gamma", "Zeta"]);
    }

    #[tokio::test]
    async fn test_query_by_topic() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        let mut web = make_conference("WebConf", "Berlin", 4, 10);
        web.topics = vec!["Web".to_string()];
        repo.create(&web).await.unwrap();
        repo.create(&make_conference("RustConf", "Berlin", 4, 10))
            .await
            .unwrap();

        let query = plan_conference_query(&[form("TOPIC", "EQ", "Web")]).unwrap();
        assert_eq!(names(&repo.query(&query).await.unwrap()), vec!["WebConf"]);
    }

    #[tokio::test]
    async fn test_list_nearly_sold_out() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        for (name, seats) in [("Full", 0), ("Tight", 2), ("Edge", 5), ("Roomy", 6)] {
            repo.create(&make_conference(name, "London", 5, seats))
                .await
                .unwrap();
        }

        let found = repo.list_nearly_sold_out(5).await.unwrap();
        assert_eq!(names(&found), vec!["Edge", "Tight"]);
    }

    #[tokio::test]
    async fn test_list_by_organizer_and_delete() {
        let repo = SqliteConferenceRepository::new(test_pool().await);
        let mut other = make_conference("Other", "Oslo", 2, 10);
        other.organizer_user_id = "someone@example.com".to_string();
        let mine = make_conference("Mine", "Oslo", 2, 10);
        repo.create(&other).await.unwrap();
        repo.create(&mine).await.unwrap();

        let found = repo.list_by_organizer("org@example.com").await.unwrap();
        assert_eq!(names(&found), vec!["Mine"]);

        repo.delete(&mine.id).await.unwrap();
        assert!(repo.get_by_id(&mine.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&mine.id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
