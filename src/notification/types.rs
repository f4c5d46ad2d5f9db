use crate::db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StreamFollowed,
    StreamsMerged,
    RoleChanged,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::StreamFollowed => "stream_followed",
            NotificationKind::StreamsMerged => "streams_merged",
            NotificationKind::RoleChanged => "role_changed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stream_followed" => Some(NotificationKind::StreamFollowed),
            "streams_merged" => Some(NotificationKind::StreamsMerged),
            "role_changed" => Some(NotificationKind::RoleChanged),
            _ => None,
        }
    }
}

/// A message addressed to one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    /// Id of the stream / user the notification is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
    pub created_at: String,
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Notification '{0}' not found")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            NotificationKind::StreamFollowed,
            NotificationKind::StreamsMerged,
            NotificationKind::RoleChanged,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("unknown"), None);
    }

    #[test]
    fn test_notification_serialization_skips_unread() {
        let n = Notification {
            id: "n1".to_string(),
            user_id: "u1".to_string(),
            kind: NotificationKind::RoleChanged,
            message: "You are now an admin".to_string(),
            subject_id: None,
            read_at: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"kind\":\"role_changed\""));
        assert!(!json.contains("readAt"));
        assert!(!json.contains("subjectId"));
    }
}
