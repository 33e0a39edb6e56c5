//! SQLite profile repository implementation.
//!
//! Profiles live in `profiles`; conference registrations and the session
//! wishlist live in their own join tables and are listed in insertion order.
//! Registration and unregistration adjust `conferences.seats_available` in
//! the same write transaction.

use std::collections::HashMap;

use confcentral_core::repository::profile::ProfileRepository;
use confcentral_types::conference::ConferenceId;
use confcentral_types::error::RepositoryError;
use confcentral_types::profile::{Profile, TeeShirtSize};
use confcentral_types::session::SessionId;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, query_err};

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn registrations(&self, user_id: &str) -> Result<Vec<ConferenceId>, RepositoryError> {
        let ids: Vec<(String,)> =
            sqlx::query_as("SELECT conference_id FROM registrations WHERE user_id = ? ORDER BY rowid")
                .bind(user_id)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_err)?;
        ids.into_iter()
            .map(|(id,)| {
                id.parse::<ConferenceId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid conference id: {e}")))
            })
            .collect()
    }

    async fn wishlist(&self, user_id: &str) -> Result<Vec<SessionId>, RepositoryError> {
        let ids: Vec<(String,)> =
            sqlx::query_as("SELECT session_id FROM wishlist WHERE user_id = ? ORDER BY rowid")
                .bind(user_id)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_err)?;
        ids.into_iter()
            .map(|(id,)| {
                id.parse::<SessionId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid session id: {e}")))
            })
            .collect()
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn get(&self, user_id: &str) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let size: String = row.try_get("tee_shirt_size").map_err(query_err)?;
        let tee_shirt_size: TeeShirtSize = size.parse().map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Some(Profile {
            user_id: row.try_get("user_id").map_err(query_err)?,
            display_name: row.try_get("display_name").map_err(query_err)?,
            main_email: row.try_get("main_email").map_err(query_err)?,
            tee_shirt_size,
            conference_keys_to_attend: self.registrations(user_id).await?,
            session_wishlist: self.wishlist(user_id).await?,
        }))
    }

    async fn save(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        let now = format_datetime(&chrono::Utc::now());
        sqlx::query(
            "INSERT INTO profiles (user_id, display_name, main_email, tee_shirt_size, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                main_email = excluded.main_email,
                tee_shirt_size = excluded.tee_shirt_size,
                updated_at = excluded.updated_at",
        )
        .bind(&profile.user_id)
        .bind(&profile.display_name)
        .bind(&profile.main_email)
        .bind(profile.tee_shirt_size.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        self.get(&profile.user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn display_names(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, String>, RepositoryError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb =
            QueryBuilder::<Sqlite>::new("SELECT user_id, display_name FROM profiles WHERE user_id IN (");
        let mut separated = qb.separated(", ");
        for id in user_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows: Vec<(String, String)> = qb
            .build_query_as()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        Ok(rows.into_iter().collect())
    }

    async fn register(
        &self,
        user_id: &str,
        conference_id: &ConferenceId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let seats: Option<(i64,)> =
            sqlx::query_as("SELECT seats_available FROM conferences WHERE id = ?")
                .bind(conference_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?;
        let Some((seats,)) = seats else {
            return Err(RepositoryError::NotFound);
        };

        let already: Option<(String,)> = sqlx::query_as(
            "SELECT user_id FROM registrations WHERE user_id = ? AND conference_id = ?",
        )
        .bind(user_id)
        .bind(conference_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_err)?;
        if already.is_some() {
            return Err(RepositoryError::Conflict(
                "You have already registered for this conference".to_string(),
            ));
        }
        if seats <= 0 {
            return Err(RepositoryError::Conflict(
                "There are no seats available.".to_string(),
            ));
        }

        sqlx::query("INSERT INTO registrations (user_id, conference_id, registered_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(conference_id.to_string())
            .bind(format_datetime(&chrono::Utc::now()))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RepositoryError::Conflict(
                        "You have already registered for this conference".to_string(),
                    )
                } else {
                    query_err(e)
                }
            })?;

        sqlx::query("UPDATE conferences SET seats_available = seats_available - 1 WHERE id = ?")
            .bind(conference_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn unregister(
        &self,
        user_id: &str,
        conference_id: &ConferenceId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let removed = sqlx::query("DELETE FROM registrations WHERE user_id = ? AND conference_id = ?")
            .bind(user_id)
            .bind(conference_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?
            .rows_affected();
        if removed == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE conferences SET seats_available = seats_available + 1 WHERE id = ?")
            .bind(conference_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(true)
    }

    async fn add_to_wishlist(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("INSERT INTO wishlist (user_id, session_id, added_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(session_id.to_string())
            .bind(format_datetime(&chrono::Utc::now()))
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Conflict(format!(
                "session {session_id} is already in the wishlist"
            ))),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(query_err(e)),
        }
    }

    async fn remove_from_wishlist(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM wishlist WHERE user_id = ? AND session_id = ?")
            .bind(user_id)
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected() > 0)
    }
}
