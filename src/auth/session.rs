use crate::db::{optional, Database, DbError};
use crate::user::{User, UserError};
use crate::utils::{hash_token, new_id, now_iso};
use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or unknown session token")]
    InvalidToken,

    #[error("Session expired")]
    SessionExpired,

    #[error("Session lifetime out of range: {0}")]
    InvalidLifetime(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error(transparent)]
    User(#[from] UserError),
}

/// A freshly issued session. `token` is only ever returned here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: String,
}

/// Issue a session for `user_id` valid for `ttl`.
pub async fn create_session(
    db: &Database,
    user_id: &str,
    ttl: Duration,
) -> Result<SessionToken, AuthError> {
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AuthError::InvalidLifetime(format!("{ttl:?}")))?;
    let token = new_id();
    let session = SessionToken {
        token: token.clone(),
        user_id: user_id.to_string(),
        expires_at: expires_at.to_rfc3339(),
    };
    let row = session.clone();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![hash_token(&token), row.user_id, now_iso(), row.expires_at],
        )?;
        Ok::<_, AuthError>(())
    })
    .await?;
    info!(user_id = %session.user_id, "Session created");
    Ok(session)
}

/// Look up the user behind `token`. Expired sessions are removed.
pub async fn resolve_session(db: &Database, token: &str) -> Result<User, AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }
    let token_hash = hash_token(token);
    db.call(move |conn| {
        let found: Option<(String, String)> = optional(conn.query_row(
            "SELECT user_id, expires_at FROM sessions WHERE token_hash = ?1",
            params![token_hash],
            |row| Ok((row.get(0)?, row.get(1)?)),
        ))?;
        let (user_id, expires_at) = found.ok_or(AuthError::InvalidToken)?;

        if is_expired(&expires_at, Utc::now()) {
            conn.execute(
                "DELETE FROM sessions WHERE token_hash = ?1",
                params![token_hash],
            )?;
            debug!(user_id = %user_id, "Dropped expired session");
            return Err(AuthError::SessionExpired);
        }
        Ok(crate::user::load_user(conn, &user_id)?)
    })
    .await
}

/// Revoke `token`. Unknown tokens are ignored.
pub async fn revoke_session(db: &Database, token: &str) -> Result<(), AuthError> {
    let token_hash = hash_token(token);
    db.call(move |conn| {
        conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?1",
            params![token_hash],
        )?;
        Ok(())
    })
    .await
}

fn is_expired(expires_at: &str, now: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(expires_at).map_or(true, |t| t.with_timezone(&Utc) <= now)
}
