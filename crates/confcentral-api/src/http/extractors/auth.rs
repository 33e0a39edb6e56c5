//! API key authentication extractor.
//!
//! Extracts and verifies API keys from:
//! - `Authorization: Bearer <key>` header
//! - `X-API-Key: <key>` header
//!
//! Keys are SHA-256 hashed and compared against the `api_keys` table, which
//! also records the user the key was issued to.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use sqlx::Row;

use confcentral_infra::sqlite::pool::DatabasePool;
use confcentral_types::profile::Caller;
use confcentral_types::speaker::{normalize_email, validate_email};

use crate::http::error::AppError;
use crate::state::AppState;

/// Prefix of every issued key.
pub const API_KEY_PREFIX: &str = "cc_";

/// The authenticated caller. Extracting this validates the API key.
pub struct CurrentUser(pub Caller);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key(parts)?;
        let caller = authenticate(&state.db_pool, &api_key).await?;
        Ok(CurrentUser(caller))
    }
}

/// Resolve a plaintext key to the caller it was issued to.
pub async fn authenticate(pool: &DatabasePool, api_key: &str) -> Result<Caller, AppError> {
    let key_hash = hash_api_key(api_key);

    let row = sqlx::query("SELECT id, user_id, email, nickname FROM api_keys WHERE key_hash = ?")
        .bind(&key_hash)
        .fetch_optional(&pool.reader)
        .await
        .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

    let Some(row) = row else {
        return Err(AppError::Unauthorized(
            "Invalid API key. Provide a valid key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
        ));
    };

    // last_used_at is best effort; a failed update does not fail the request
    let id: String = row.get("id");
    let now = chrono::Utc::now().to_rfc3339();
    if let Err(e) = sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
        .bind(&now)
        .bind(&id)
        .execute(&pool.writer)
        .await
    {
        tracing::warn!(error = %e, "failed to record API key use");
    }

    Ok(Caller {
        user_id: row.get("user_id"),
        email: row.get("email"),
        nickname: row.get("nickname"),
    })
}

/// Extract the API key from request headers.
fn extract_api_key(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(key) = auth_str.strip_prefix("Bearer ") {
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key) = parts.headers.get("x-api-key") {
        let key_str = key.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(key_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Authorization required. Provide an API key via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header.".to_string(),
    ))
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

/// Issue a new API key for a user and store its hash.
///
/// The user id is the normalized email. An empty nickname falls back to
/// the local part of the email. Returns the plaintext key, which is not
/// stored anywhere.
pub async fn issue_api_key(
    pool: &DatabasePool,
    email: &str,
    nickname: &str,
) -> anyhow::Result<String> {
    let email = normalize_email(email);
    validate_email(&email).map_err(|e| anyhow::anyhow!(e))?;

    let nickname = match nickname.trim() {
        "" => email.split('@').next().unwrap_or_default().to_string(),
        name => name.to_string(),
    };

    let key_bytes: [u8; 32] = rand::random();
    let plaintext_key = format!(
        "{API_KEY_PREFIX}{}",
        key_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
    );

    let key_hash = hash_api_key(&plaintext_key);
    let id = uuid::Uuid::now_v7().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO api_keys (id, key_hash, user_id, email, nickname, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&key_hash)
    .bind(&email)
    .bind(&email)
    .bind(&nickname)
    .bind(&now)
    .execute(&pool.writer)
    .await?;

    tracing::info!(user_id = %email, "API key issued");
    Ok(plaintext_key)
}
