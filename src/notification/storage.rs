use super::types::{Notification, NotificationKind};
use crate::utils::{new_id, now_iso};
use rusqlite::{params, Connection, Row};

pub(super) const COLUMNS: &str = "id, user_id, kind, message, subject_id, read_at, created_at";

/// Insert a notification using the caller's connection or transaction.
pub fn insert_notification(
    conn: &Connection,
    user_id: &str,
    kind: NotificationKind,
    message: &str,
    subject_id: Option<&str>,
) -> rusqlite::Result<Notification> {
    let notification = Notification {
        id: new_id(),
        user_id: user_id.to_string(),
        kind,
        message: message.to_string(),
        subject_id: subject_id.map(ToString::to_string),
        read_at: None,
        created_at: now_iso(),
    };
    conn.execute(
        "INSERT INTO notifications (id, user_id, kind, message, subject_id, read_at, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6)",
        params![
            notification.id,
            notification.user_id,
            notification.kind.as_str(),
            notification.message,
            notification.subject_id,
            notification.created_at,
        ],
    )?;
    Ok(notification)
}

pub(super) fn row_to_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let kind: String = row.get(2)?;
    let kind = NotificationKind::parse(&kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown notification kind '{kind}'").into(),
        )
    })?;
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind,
        message: row.get(3)?,
        subject_id: row.get(4)?,
        read_at: row.get(5)?,
        created_at: row.get(6)?,
    })
}
