use crate::db::DbError;
use crate::ordering::OrderingError;
use serde::Serialize;
use thiserror::Error;

/// One image in a gallery block
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub block_id: String,
    pub asset_id: String,
    pub position: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub created_at: String,
}

/// Result of replacing a gallery's image set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The new set is in place
    Replaced(Vec<GalleryImage>),
    /// Writing the new set failed and the previous set was restored
    FailedRestored { reason: String },
    /// Writing failed and restoring the previous set failed as well
    FailedUnrestored { reason: String },
}

impl ReplaceOutcome {
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, ReplaceOutcome::Replaced(_))
    }
}

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),

    #[error("Block '{0}' not found")]
    BlockNotFound(String),

    #[error("Block '{0}' is not an image gallery")]
    NotAGallery(String),

    #[error("Gallery image '{0}' not found")]
    ImageNotFound(String),

    #[error("Asset '{0}' not found")]
    AssetNotFound(String),

    #[error("Asset '{0}' is listed more than once")]
    DuplicateAsset(String),

    #[error("Gallery cannot hold more than {max} images")]
    TooManyImages { max: i64 },
}
