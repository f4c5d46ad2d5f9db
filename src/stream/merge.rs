//! Merging one stream into another.

use super::crud::get_stream_summary;
use super::storage::{load_stream, member_ids};
use super::types::{MergeResult, StreamError};
use crate::block::{delete_blocks_of, BlockParent};
use crate::db::{immediate, Database};
use crate::notification::{insert_notification, NotificationKind};
use rusqlite::params;
use tracing::info;

struct MergeCounts {
    assets_added: usize,
    members_added: usize,
    bookmarks_moved: usize,
    drops_moved: usize,
    members_notified: usize,
}

/// Fold `source_id` into `target_id` and delete the source.
///
/// Asset tags and memberships are copied with `INSERT OR IGNORE`, so
/// overlap between the two streams is harmless. Bookmarks and drops move
/// to the target; the source's own blocks are dropped. Everything happens
/// in one transaction.
pub async fn merge_streams(
    db: &Database,
    source_id: &str,
    target_id: &str,
) -> Result<MergeResult, StreamError> {
    if source_id == target_id {
        return Err(StreamError::SelfMerge);
    }
    let source_id = source_id.to_string();
    let target_id_owned = target_id.to_string();
    let counts = db
        .call(move |conn| {
            let target_id = target_id_owned;
            let tx = immediate(conn)?;
            let source = load_stream(&tx, &source_id)?;
            let target = load_stream(&tx, &target_id)?;
            let source_members = member_ids(&tx, &source_id)?;

            let assets_added = tx.execute(
                "INSERT OR IGNORE INTO stream_assets (stream_id, asset_id, added_by, added_at) \
                 SELECT ?1, asset_id, added_by, added_at FROM stream_assets WHERE stream_id = ?2",
                params![target_id, source_id],
            )?;
            let members_added = tx.execute(
                "INSERT OR IGNORE INTO stream_members (stream_id, user_id, joined_at) \
                 SELECT ?1, user_id, joined_at FROM stream_members WHERE stream_id = ?2",
                params![target_id, source_id],
            )?;
            let bookmarks_moved = tx.execute(
                "UPDATE bookmarks SET stream_id = ?1 WHERE stream_id = ?2",
                params![target_id, source_id],
            )?;
            let drops_moved = tx.execute(
                "UPDATE drops SET stream_id = ?1 WHERE stream_id = ?2",
                params![target_id, source_id],
            )?;
            delete_blocks_of(&tx, &BlockParent::Stream(source_id.clone()))?;

            let message = format!("'{}' was merged into '{}'", source.name, target.name);
            for user_id in &source_members {
                insert_notification(
                    &tx,
                    user_id,
                    NotificationKind::StreamsMerged,
                    &message,
                    Some(&target.id),
                )?;
            }

            tx.execute("DELETE FROM streams WHERE id = ?1", params![source_id])?;
            tx.commit()?;
            info!("Merged stream {} into {}", source.slug, target.slug);
            Ok::<_, StreamError>(MergeCounts {
                assets_added,
                members_added,
                bookmarks_moved,
                drops_moved,
                members_notified: source_members.len(),
            })
        })
        .await?;

    let target = get_stream_summary(db, target_id).await?;
    Ok(MergeResult {
        target,
        assets_added: counts.assets_added,
        members_added: counts.members_added,
        bookmarks_moved: counts.bookmarks_moved,
        drops_moved: counts.drops_moved,
        members_notified: counts.members_notified,
    })
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
