use crate::db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named collection of assets, members and bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creator_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A stream plus counts derived at read time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamSummary {
    #[serde(flatten)]
    pub stream: Stream,
    pub asset_count: i64,
    pub member_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamMember {
    pub stream_id: String,
    pub user_id: String,
    pub joined_at: String,
}

/// An asset tagged to a stream. Unordered; read back by `added_at`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreamAsset {
    pub stream_id: String,
    pub asset_id: String,
    pub added_by: String,
    pub added_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub stream_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of renaming a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(Stream),
    /// Another stream already uses the target slug
    NameConflict(Stream),
}

/// Result of merging one stream into another
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub target: StreamSummary,
    pub assets_added: usize,
    pub members_added: usize,
    pub bookmarks_moved: usize,
    pub drops_moved: usize,
    pub members_notified: usize,
}

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Stream '{0}' not found")]
    StreamNotFound(String),

    #[error("A stream with slug '{0}' already exists")]
    SlugTaken(String),

    #[error("Invalid stream name: {0}")]
    InvalidName(String),

    #[error("Invalid bookmark: {0}")]
    InvalidBookmark(String),

    #[error("Bookmark '{0}' not found")]
    BookmarkNotFound(String),

    #[error("Asset '{0}' not found")]
    AssetNotFound(String),

    #[error("User '{0}' is not a member of this stream")]
    NotMember(String),

    #[error("Cannot merge a stream into itself")]
    SelfMerge,
}

pub const MAX_NAME_LENGTH: usize = 80;

/// Trim a stream name and derive its slug.
pub fn name_and_slug(name: &str) -> Result<(String, String), StreamError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StreamError::InvalidName("name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(StreamError::InvalidName(format!(
            "name is longer than {MAX_NAME_LENGTH} characters"
        )));
    }
    let slug = crate::utils::slugify_name(name);
    if slug.is_empty() {
        return Err(StreamError::InvalidName(format!(
            "'{name}' has no letters or digits"
        )));
    }
    Ok((name.to_string(), slug))
}

/// Bookmarks must be absolute http(s) URLs.
pub fn validate_bookmark_url(raw: &str) -> Result<String, StreamError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| StreamError::InvalidBookmark(format!("'{raw}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => Err(StreamError::InvalidBookmark(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_slug() {
        let (name, slug) = name_and_slug("  Street Photography ").unwrap();
        assert_eq!(name, "Street Photography");
        assert_eq!(slug, "street-photography");
        assert!(matches!(name_and_slug("   "), Err(StreamError::InvalidName(_))));
        assert!(matches!(name_and_slug("!!!"), Err(StreamError::InvalidName(_))));
        assert!(name_and_slug(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_bookmark_url() {
        assert_eq!(
            validate_bookmark_url("https://example.com/a").unwrap(),
            "https://example.com/a"
        );
        assert!(validate_bookmark_url("ftp://example.com").is_err());
        assert!(validate_bookmark_url("example.com").is_err());
    }
}
