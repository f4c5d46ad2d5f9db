use crate::db::DbError;
use crate::ordering::OrderingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An uploaded media file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// MIME type, e.g. `image/jpeg`
    pub media_type: String,
    /// Where the CDN serves the file from
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    pub created_at: String,
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),

    #[error("Asset '{0}' not found")]
    AssetNotFound(String),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    #[error("Asset '{asset_id}' is referenced by {blocks} block(s)")]
    AssetInUse { asset_id: String, blocks: i64 },
}

/// Validate a MIME type of the form `type/subtype`.
pub fn validate_media_type(media_type: &str) -> Result<(), AssetError> {
    let mut parts = media_type.splitn(2, '/');
    let (Some(kind), Some(subtype)) = (parts.next(), parts.next()) else {
        return Err(AssetError::InvalidAsset(format!(
            "media type '{media_type}' must look like type/subtype"
        )));
    };
    let valid = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
    };
    if valid(kind) && valid(subtype) {
        Ok(())
    } else {
        Err(AssetError::InvalidAsset(format!(
            "media type '{media_type}' must look like type/subtype"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_media_type() {
        assert!(validate_media_type("image/jpeg").is_ok());
        assert!(validate_media_type("image/svg+xml").is_ok());
        assert!(validate_media_type("video/mp4").is_ok());

        assert!(validate_media_type("image").is_err());
        assert!(validate_media_type("/jpeg").is_err());
        assert!(validate_media_type("image/").is_err());
        assert!(validate_media_type("image/jp eg").is_err());
    }

    #[test]
    fn test_asset_serialization_skips_missing_dimensions() {
        let asset = Asset {
            id: "a1".to_string(),
            owner_id: "u1".to_string(),
            title: "Harbor".to_string(),
            media_type: "image/jpeg".to_string(),
            url: "https://cdn.example.com/a1.jpg".to_string(),
            width: None,
            height: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&asset).unwrap();
        assert!(json.contains("\"mediaType\":\"image/jpeg\""));
        assert!(!json.contains("width"));
    }
}
