//! SQLite speaker repository implementation.

use std::collections::HashMap;

use confcentral_core::repository::speaker::SpeakerRepository;
use confcentral_types::error::RepositoryError;
use confcentral_types::speaker::Speaker;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, query_err};

/// SQLite-backed implementation of `SpeakerRepository`.
pub struct SqliteSpeakerRepository {
    pool: DatabasePool,
}

impl SqliteSpeakerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn speaker_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Speaker, RepositoryError> {
    Ok(Speaker {
        email: row.try_get("email").map_err(query_err)?,
        name: row.try_get("name").map_err(query_err)?,
        biography: row.try_get("biography").map_err(query_err)?,
        company: row.try_get("company").map_err(query_err)?,
    })
}

impl SpeakerRepository for SqliteSpeakerRepository {
    async fn create(&self, speaker: &Speaker) -> Result<Speaker, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO speakers (email, name, biography, company, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&speaker.email)
        .bind(&speaker.name)
        .bind(&speaker.biography)
        .bind(&speaker.company)
        .bind(format_datetime(&chrono::Utc::now()))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(speaker.clone()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Conflict(format!(
                "speaker '{}' already exists",
                speaker.email
            ))),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get(&self, email: &str) -> Result<Option<Speaker>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM speakers WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.as_ref().map(speaker_from_row).transpose()
    }

    async fn get_many(&self, emails: &[String]) -> Result<Vec<Speaker>, RepositoryError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM speakers WHERE email IN (");
        let mut separated = qb.separated(", ");
        for email in emails {
            separated.push_bind(email.clone());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let mut by_email = HashMap::with_capacity(rows.len());
        for row in &rows {
            let speaker = speaker_from_row(row)?;
            by_email.insert(speaker.email.clone(), speaker);
        }
        Ok(emails.iter().filter_map(|e| by_email.remove(e)).collect())
    }

    async fn list(&self) -> Result<Vec<Speaker>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM speakers ORDER BY name, email")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;
        rows.iter().map(speaker_from_row).collect()
    }

    async fn delete(&self, email: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM speakers WHERE email = ?")
            .bind(email)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
