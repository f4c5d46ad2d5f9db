//! Block type definitions and error types.

use crate::db::DbError;
use crate::ordering::OrderingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What a block list hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockParent {
    Drop(String),
    Stream(String),
}

impl BlockParent {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            BlockParent::Drop(_) => "drop",
            BlockParent::Stream(_) => "stream",
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            BlockParent::Drop(id) | BlockParent::Stream(id) => id,
        }
    }

    /// Value of the `parent_key` column, e.g. `drop:0b6f...`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.kind(), self.id())
    }
}

impl fmt::Display for BlockParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.id())
    }
}

/// Closed set of block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Heading,
    Post,
    FeaturedPost,
    Divider,
    Quote,
    ImageGallery,
}

impl BlockKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Heading => "heading",
            BlockKind::Post => "post",
            BlockKind::FeaturedPost => "featured_post",
            BlockKind::Divider => "divider",
            BlockKind::Quote => "quote",
            BlockKind::ImageGallery => "image_gallery",
        }
    }
}

/// Type-specific block payload. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Text {
        content: String,
    },
    Heading {
        content: String,
        level: u8,
    },
    #[serde(rename_all = "camelCase")]
    Post {
        asset_id: String,
    },
    #[serde(rename_all = "camelCase")]
    FeaturedPost {
        asset_id: String,
    },
    Divider,
    Quote {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    ImageGallery {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
}

impl BlockContent {
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Text { .. } => BlockKind::Text,
            BlockContent::Heading { .. } => BlockKind::Heading,
            BlockContent::Post { .. } => BlockKind::Post,
            BlockContent::FeaturedPost { .. } => BlockKind::FeaturedPost,
            BlockContent::Divider => BlockKind::Divider,
            BlockContent::Quote { .. } => BlockKind::Quote,
            BlockContent::ImageGallery { .. } => BlockKind::ImageGallery,
        }
    }

    /// Asset referenced by post-style blocks.
    #[must_use]
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            BlockContent::Post { asset_id } | BlockContent::FeaturedPost { asset_id } => {
                Some(asset_id)
            }
            _ => None,
        }
    }

    /// Check payload fields that serde cannot express.
    pub fn validate(&self) -> Result<(), BlockError> {
        match self {
            BlockContent::Text { content } | BlockContent::Quote { content, .. }
                if content.trim().is_empty() =>
            {
                Err(BlockError::InvalidBlock(format!(
                    "{} block content cannot be empty",
                    self.kind().as_str()
                )))
            }
            BlockContent::Heading { content, level } => {
                if content.trim().is_empty() {
                    Err(BlockError::InvalidBlock(
                        "heading content cannot be empty".to_string(),
                    ))
                } else if !(1..=6).contains(level) {
                    Err(BlockError::InvalidBlock(format!(
                        "heading level must be between 1 and 6, got {level}"
                    )))
                } else {
                    Ok(())
                }
            }
            BlockContent::Post { asset_id } | BlockContent::FeaturedPost { asset_id }
                if asset_id.trim().is_empty() =>
            {
                Err(BlockError::InvalidBlock("assetId is required".to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// A positioned block
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub parent_kind: String,
    pub parent_id: String,
    pub position: i64,
    #[serde(flatten)]
    pub content: BlockContent,
    pub created_at: String,
    pub updated_at: String,
}

/// Block-related errors
#[derive(Error, Debug)]
pub enum BlockError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Ordering error: {0}")]
    Ordering(#[from] OrderingError),

    #[error("{0} not found")]
    ParentNotFound(String),

    #[error("Block '{0}' not found")]
    BlockNotFound(String),

    #[error("Asset '{0}' not found")]
    AssetNotFound(String),

    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Cannot change a {from} block into a {to} block")]
    KindChange { from: String, to: String },

    #[error("{parent} already holds the maximum of {max} blocks")]
    TooManyBlocks { parent: String, max: i64 },
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
