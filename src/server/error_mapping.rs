//! Maps domain errors to HTTP status, error code and an optional tip.

use crate::asset::AssetError;
use crate::auth::AuthError;
use crate::block::BlockError;
use crate::db::DbError;
use crate::drop::DropError;
use crate::gallery::GalleryError;
use crate::notification::NotificationError;
use crate::ordering::OrderingError;
use crate::search::SearchError;
use crate::stream::StreamError;
use crate::user::UserError;
use http::StatusCode;

/// Trait for mapping domain errors to structured error codes and optional tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);

    fn status(&self) -> StatusCode;
}

const INTERNAL: (&str, Option<&str>) = ("INTERNAL_ERROR", None);

impl ToStructuredError for DbError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            DbError::Sqlite(_) | DbError::Io(_) => ("DATABASE_ERROR", None),
            DbError::Poisoned | DbError::Join(_) => INTERNAL,
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ToStructuredError for OrderingError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            OrderingError::NotFound(_) => ("NOT_FOUND", None),
            OrderingError::InvalidPosition { .. } => (
                "INVALID_POSITION",
                Some("Use a position between 0 and the current number of items"),
            ),
            OrderingError::NotAPermutation { .. } => (
                "INVALID_ORDER",
                Some("List every existing id exactly once"),
            ),
            OrderingError::Sqlite(_) => ("DATABASE_ERROR", None),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            OrderingError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderingError::InvalidPosition { .. } | OrderingError::NotAPermutation { .. } => {
                StatusCode::BAD_REQUEST
            }
            OrderingError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ToStructuredError for UserError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            UserError::Sqlite(_) => ("DATABASE_ERROR", None),
            UserError::Database(e) => e.error_code_and_tip(),
            UserError::UserNotFound(_) => ("USER_NOT_FOUND", None),
            UserError::UsernameTaken(_) => ("USERNAME_TAKEN", Some("Pick another username")),
            UserError::InvalidUsername(_) => ("INVALID_USERNAME", None),
            UserError::InvalidRole(_) => ("INVALID_ROLE", Some("Use user, admin or owner")),
            UserError::NotOwner => ("FORBIDDEN", None),
            UserError::OwnerSelfDemotion => (
                "OWNER_SELF_DEMOTION",
                Some("Promote another user to owner instead"),
            ),
            UserError::TransferRolledBack(_) => ("ROLE_TRANSFER_FAILED", None),
            UserError::TransferCritical(_) => (
                "CRITICAL_OWNER_TRANSFER",
                Some("The platform may have no owner; check the users table"),
            ),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            UserError::UserNotFound(_) => StatusCode::NOT_FOUND,
            UserError::UsernameTaken(_) => StatusCode::CONFLICT,
            UserError::InvalidUsername(_)
            | UserError::InvalidRole(_)
            | UserError::OwnerSelfDemotion => StatusCode::BAD_REQUEST,
            UserError::NotOwner => StatusCode::FORBIDDEN,
            UserError::Sqlite(_)
            | UserError::Database(_)
            | UserError::TransferRolledBack(_)
            | UserError::TransferCritical(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ToStructuredError for AuthError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            AuthError::MissingToken => (
                "UNAUTHORIZED",
                Some("Send 'Authorization: Bearer <token>'"),
            ),
            AuthError::InvalidToken => ("UNAUTHORIZED", Some("Log in again")),
            AuthError::SessionExpired => ("SESSION_EXPIRED", Some("Log in again")),
            AuthError::InvalidLifetime(_) => (
                "INVALID_SESSION_TTL",
                Some("Set [server] session_ttl to at most 366days"),
            ),
            AuthError::Sqlite(_) => ("DATABASE_ERROR", None),
            AuthError::Database(e) => e.error_code_and_tip(),
            AuthError::User(e) => e.error_code_and_tip(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidLifetime(_) | AuthError::Sqlite(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::User(e) => e.status(),
        }
    }
}

impl ToStructuredError for AssetError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            AssetError::Sqlite(_) => ("DATABASE_ERROR", None),
            AssetError::Database(e) => e.error_code_and_tip(),
            AssetError::Ordering(e) => e.error_code_and_tip(),
            AssetError::AssetNotFound(_) => ("ASSET_NOT_FOUND", None),
            AssetError::InvalidAsset(_) => ("VALIDATION_ERROR", None),
            AssetError::AssetInUse { .. } => (
                "ASSET_IN_USE",
                Some("Delete or change the post blocks that show this asset first"),
            ),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AssetError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AssetError::Database(e) => e.status(),
            AssetError::Ordering(e) => e.status(),
            AssetError::AssetNotFound(_) => StatusCode::NOT_FOUND,
            AssetError::InvalidAsset(_) => StatusCode::BAD_REQUEST,
            AssetError::AssetInUse { .. } => StatusCode::CONFLICT,
        }
    }
}

impl ToStructuredError for BlockError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            BlockError::Sqlite(_) => ("DATABASE_ERROR", None),
            BlockError::Database(e) => e.error_code_and_tip(),
            BlockError::JsonError(_) => ("JSON_ERROR", None),
            BlockError::Ordering(e) => e.error_code_and_tip(),
            BlockError::ParentNotFound(_) => ("PARENT_NOT_FOUND", None),
            BlockError::BlockNotFound(_) => ("BLOCK_NOT_FOUND", None),
            BlockError::AssetNotFound(_) => ("ASSET_NOT_FOUND", None),
            BlockError::InvalidBlock(_) => ("VALIDATION_ERROR", None),
            BlockError::KindChange { .. } => (
                "BLOCK_KIND_CHANGE",
                Some("Delete the block and insert one of the new type"),
            ),
            BlockError::TooManyBlocks { .. } => ("LIMIT_EXCEEDED", None),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BlockError::Sqlite(_) | BlockError::JsonError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BlockError::Database(e) => e.status(),
            BlockError::Ordering(e) => e.status(),
            BlockError::ParentNotFound(_)
            | BlockError::BlockNotFound(_)
            | BlockError::AssetNotFound(_) => StatusCode::NOT_FOUND,
            BlockError::InvalidBlock(_)
            | BlockError::KindChange { .. }
            | BlockError::TooManyBlocks { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl ToStructuredError for GalleryError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            GalleryError::Sqlite(_) => ("DATABASE_ERROR", None),
            GalleryError::Database(e) => e.error_code_and_tip(),
            GalleryError::Ordering(e) => e.error_code_and_tip(),
            GalleryError::BlockNotFound(_) => ("BLOCK_NOT_FOUND", None),
            GalleryError::NotAGallery(_) => ("NOT_A_GALLERY", None),
            GalleryError::ImageNotFound(_) => ("IMAGE_NOT_FOUND", None),
            GalleryError::AssetNotFound(_) => ("ASSET_NOT_FOUND", None),
            GalleryError::DuplicateAsset(_) => ("VALIDATION_ERROR", None),
            GalleryError::TooManyImages { .. } => ("LIMIT_EXCEEDED", None),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            GalleryError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GalleryError::Database(e) => e.status(),
            GalleryError::Ordering(e) => e.status(),
            GalleryError::BlockNotFound(_)
            | GalleryError::ImageNotFound(_)
            | GalleryError::AssetNotFound(_) => StatusCode::NOT_FOUND,
            GalleryError::NotAGallery(_)
            | GalleryError::DuplicateAsset(_)
            | GalleryError::TooManyImages { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl ToStructuredError for StreamError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            StreamError::Sqlite(_) => ("DATABASE_ERROR", None),
            StreamError::Database(e) => e.error_code_and_tip(),
            StreamError::StreamNotFound(_) => ("STREAM_NOT_FOUND", None),
            StreamError::SlugTaken(_) => ("SLUG_TAKEN", Some("Choose a different stream name")),
            StreamError::InvalidName(_) | StreamError::InvalidBookmark(_) => {
                ("VALIDATION_ERROR", None)
            }
            StreamError::BookmarkNotFound(_) => ("BOOKMARK_NOT_FOUND", None),
            StreamError::AssetNotFound(_) => ("ASSET_NOT_FOUND", None),
            StreamError::NotMember(_) => ("NOT_MEMBER", None),
            StreamError::SelfMerge => ("VALIDATION_ERROR", Some("Pick two different streams")),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            StreamError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StreamError::Database(e) => e.status(),
            StreamError::StreamNotFound(_)
            | StreamError::BookmarkNotFound(_)
            | StreamError::AssetNotFound(_)
            | StreamError::NotMember(_) => StatusCode::NOT_FOUND,
            StreamError::SlugTaken(_) => StatusCode::CONFLICT,
            StreamError::InvalidName(_)
            | StreamError::InvalidBookmark(_)
            | StreamError::SelfMerge => StatusCode::BAD_REQUEST,
        }
    }
}

impl ToStructuredError for DropError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            DropError::Sqlite(_) => ("DATABASE_ERROR", None),
            DropError::Database(e) => e.error_code_and_tip(),
            DropError::DropNotFound(_) => ("DROP_NOT_FOUND", None),
            DropError::StreamNotFound(_) => ("STREAM_NOT_FOUND", None),
            DropError::InvalidTitle(_) => ("VALIDATION_ERROR", None),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            DropError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DropError::Database(e) => e.status(),
            DropError::DropNotFound(_) | DropError::StreamNotFound(_) => StatusCode::NOT_FOUND,
            DropError::InvalidTitle(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl ToStructuredError for NotificationError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            NotificationError::Sqlite(_) => ("DATABASE_ERROR", None),
            NotificationError::Database(e) => e.error_code_and_tip(),
            NotificationError::NotFound(_) => ("NOTIFICATION_NOT_FOUND", None),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            NotificationError::NotFound(_) => StatusCode::NOT_FOUND,
            NotificationError::Sqlite(_) | NotificationError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ToStructuredError for SearchError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            SearchError::ParseError(_) => ("VALIDATION_ERROR", Some("Pass at least one search term in 'q'")),
            SearchError::UnknownKind(_) => (
                "VALIDATION_ERROR",
                Some("Filter with kind:stream, kind:drop or kind:asset"),
            ),
            SearchError::Sqlite(_) => ("DATABASE_ERROR", None),
            SearchError::Database(e) => e.error_code_and_tip(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SearchError::ParseError(_) | SearchError::UnknownKind(_) => StatusCode::BAD_REQUEST,
            SearchError::Sqlite(_) | SearchError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
#[path = "error_mapping_tests.rs"]
mod error_mapping_tests;
