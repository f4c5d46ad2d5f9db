use crate::db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A post authored by a user, optionally filed under a stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Drop {
    pub id: String,
    pub author_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    /// Set once the drop gets its first block
    pub uses_blocks: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Error, Debug)]
pub enum DropError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Drop '{0}' not found")]
    DropNotFound(String),

    #[error("Stream '{0}' not found")]
    StreamNotFound(String),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),
}

pub const MAX_TITLE_LENGTH: usize = 200;

/// Trim and check a drop title.
pub fn validate_title(title: &str) -> Result<String, DropError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DropError::InvalidTitle("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DropError::InvalidTitle(format!(
            "title is longer than {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(title.to_string())
}
