//! Stream membership (following).

use super::storage::{insert_member, load_stream};
use super::types::{StreamError, StreamMember};
use crate::db::{immediate, Database};
use crate::notification::{insert_notification, NotificationKind};
use crate::utils::now_iso;
use rusqlite::params;
use tracing::{debug, info};

/// Follow a stream. Following twice is a no-op.
///
/// The stream's creator is notified the first time someone else follows.
pub async fn follow_stream(
    db: &Database,
    stream_id: &str,
    user_id: &str,
) -> Result<StreamMember, StreamError> {
    let stream_id = stream_id.to_string();
    let user_id = user_id.to_string();
    db.call(move |conn| {
        let tx = immediate(conn)?;
        let stream = load_stream(&tx, &stream_id)?;
        let joined_at = now_iso();
        if insert_member(&tx, &stream_id, &user_id, &joined_at)? {
            if stream.creator_id != user_id {
                insert_notification(
                    &tx,
                    &stream.creator_id,
                    NotificationKind::StreamFollowed,
                    &format!("Someone started following '{}'", stream.name),
                    Some(&stream.id),
                )?;
            }
            info!("User {} followed stream {}", user_id, stream.slug);
        } else {
            debug!("User {} already follows stream {}", user_id, stream.slug);
        }
        let member = tx.query_row(
            "SELECT stream_id, user_id, joined_at FROM stream_members \
             WHERE stream_id = ?1 AND user_id = ?2",
            params![stream_id, user_id],
            |row| {
                Ok(StreamMember {
                    stream_id: row.get(0)?,
                    user_id: row.get(1)?,
                    joined_at: row.get(2)?,
                })
            },
        )?;
        tx.commit()?;
        Ok(member)
    })
    .await
}

/// Stop following a stream.
pub async fn unfollow_stream(
    db: &Database,
    stream_id: &str,
    user_id: &str,
) -> Result<(), StreamError> {
    let stream_id = stream_id.to_string();
    let user_id = user_id.to_string();
    db.call(move |conn| {
        load_stream(conn, &stream_id)?;
        let removed = conn.execute(
            "DELETE FROM stream_members WHERE stream_id = ?1 AND user_id = ?2",
            params![stream_id, user_id],
        )?;
        if removed == 0 {
            return Err(StreamError::NotMember(user_id));
        }
        info!("User {} unfollowed stream {}", user_id, stream_id);
        Ok(())
    })
    .await
}

/// Members of a stream in join order.
pub async fn list_members(db: &Database, stream_id: &str) -> Result<Vec<StreamMember>, StreamError> {
    let stream_id = stream_id.to_string();
    db.call(move |conn| {
        load_stream(conn, &stream_id)?;
        let mut stmt = conn.prepare(
            "SELECT stream_id, user_id, joined_at FROM stream_members \
             WHERE stream_id = ?1 ORDER BY joined_at, user_id",
        )?;
        let rows = stmt.query_map(params![stream_id], |row| {
            Ok(StreamMember {
                stream_id: row.get(0)?,
                user_id: row.get(1)?,
                joined_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}
