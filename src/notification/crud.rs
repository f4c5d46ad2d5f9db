//! Notification reads and read-state updates.

use super::storage::{insert_notification, row_to_notification, COLUMNS};
use super::types::{Notification, NotificationError, NotificationKind};
use crate::db::Database;
use crate::utils::now_iso;
use rusqlite::params;
use tracing::debug;

/// Options for listing notifications
#[derive(Debug, Clone, Default)]
pub struct ListNotificationsOptions {
    pub unread_only: bool,
    pub limit: i64,
}

/// Record a notification for `user_id`.
pub async fn notify(
    db: &Database,
    user_id: &str,
    kind: NotificationKind,
    message: &str,
    subject_id: Option<&str>,
) -> Result<Notification, NotificationError> {
    let user_id = user_id.to_string();
    let message = message.to_string();
    let subject_id = subject_id.map(ToString::to_string);
    db.call(move |conn| {
        Ok(insert_notification(
            conn,
            &user_id,
            kind,
            &message,
            subject_id.as_deref(),
        )?)
    })
    .await
}

/// List a user's notifications, newest first.
pub async fn list_notifications(
    db: &Database,
    user_id: &str,
    options: ListNotificationsOptions,
) -> Result<Vec<Notification>, NotificationError> {
    let user_id = user_id.to_string();
    let limit = if options.limit > 0 { options.limit } else { 50 };
    db.call(move |conn| {
        let filter = if options.unread_only {
            " AND read_at IS NULL"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM notifications WHERE user_id = ?1{filter} \
             ORDER BY created_at DESC, id LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, limit], row_to_notification)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}

/// Mark one notification read. Only the recipient may do this.
pub async fn mark_read(
    db: &Database,
    user_id: &str,
    notification_id: &str,
) -> Result<Notification, NotificationError> {
    let user_id = user_id.to_string();
    let notification_id = notification_id.to_string();
    db.call(move |conn| {
        conn.execute(
            "UPDATE notifications SET read_at = COALESCE(read_at, ?1) WHERE id = ?2 AND user_id = ?3",
            params![now_iso(), notification_id, user_id],
        )?;
        let sql = format!("SELECT {COLUMNS} FROM notifications WHERE id = ?1 AND user_id = ?2");
        crate::db::optional(conn.query_row(
            &sql,
            params![notification_id, user_id],
            row_to_notification,
        ))?
        .ok_or(NotificationError::NotFound(notification_id))
    })
    .await
}

/// Mark every unread notification of `user_id` read. Returns how many changed.
pub async fn mark_all_read(db: &Database, user_id: &str) -> Result<usize, NotificationError> {
    let user_id = user_id.to_string();
    let changed = db
        .call(move |conn| {
            Ok::<_, NotificationError>(conn.execute(
                "UPDATE notifications SET read_at = ?1 WHERE user_id = ?2 AND read_at IS NULL",
                params![now_iso(), user_id],
            )?)
        })
        .await?;
    debug!(changed, "Marked notifications read");
    Ok(changed)
}
