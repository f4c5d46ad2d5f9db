//! Drop CRUD operations.

use super::storage::{load_drop, row_to_drop, DROP_COLUMNS};
use super::types::{validate_title, Drop, DropError};
use crate::block::{delete_blocks_of, BlockParent};
use crate::db::{immediate, Database};
use crate::utils::{new_id, now_iso};
use rusqlite::params;
use serde::Serialize;
use tracing::info;

/// Options for creating a drop
#[derive(Debug, Clone)]
pub struct CreateDropOptions {
    pub author_id: String,
    pub title: String,
    pub stream_id: Option<String>,
}

/// Filters for listing drops
#[derive(Debug, Clone, Default)]
pub struct ListDropsOptions {
    pub author_id: Option<String>,
    pub stream_id: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Result of deleting a drop
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDropResult {
    pub drop: Drop,
    pub blocks_removed: usize,
}

pub async fn create_drop(db: &Database, options: CreateDropOptions) -> Result<Drop, DropError> {
    let title = validate_title(&options.title)?;
    let now = now_iso();
    let drop = Drop {
        id: new_id(),
        author_id: options.author_id,
        title,
        stream_id: options.stream_id,
        uses_blocks: false,
        created_at: now.clone(),
        updated_at: now,
    };

    let row = drop.clone();
    db.call(move |conn| {
        if let Some(stream_id) = &row.stream_id {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM streams WHERE id = ?1)",
                params![stream_id],
                |r| r.get(0),
            )?;
            if !exists {
                return Err(DropError::StreamNotFound(stream_id.clone()));
            }
        }
        conn.execute(
            "INSERT INTO drops (id, author_id, title, stream_id, uses_blocks, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
            params![
                row.id,
                row.author_id,
                row.title,
                row.stream_id,
                row.created_at,
                row.updated_at
            ],
        )?;
        Ok(())
    })
    .await?;

    info!("Created drop: {}", drop.id);
    Ok(drop)
}

pub async fn get_drop(db: &Database, drop_id: &str) -> Result<Drop, DropError> {
    let drop_id = drop_id.to_string();
    db.call(move |conn| load_drop(conn, &drop_id)).await
}

/// List drops, newest first.
pub async fn list_drops(db: &Database, options: ListDropsOptions) -> Result<Vec<Drop>, DropError> {
    let limit = if options.limit > 0 { options.limit } else { 50 };
    db.call(move |conn| {
        let sql = format!(
            "SELECT {DROP_COLUMNS} FROM drops \
             WHERE (?1 IS NULL OR author_id = ?1) AND (?2 IS NULL OR stream_id = ?2) \
             ORDER BY created_at DESC, id LIMIT ?3 OFFSET ?4"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![options.author_id, options.stream_id, limit, options.offset],
            row_to_drop,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}

/// Update a drop's title. `None` leaves the drop untouched.
pub async fn update_drop(
    db: &Database,
    drop_id: &str,
    title: Option<String>,
) -> Result<Drop, DropError> {
    let title = title.as_deref().map(validate_title).transpose()?;
    let drop_id = drop_id.to_string();
    db.call(move |conn| {
        let mut drop = load_drop(conn, &drop_id)?;
        let Some(title) = title else {
            return Ok(drop);
        };
        drop.title = title;
        drop.updated_at = now_iso();
        conn.execute(
            "UPDATE drops SET title = ?1, updated_at = ?2 WHERE id = ?3",
            params![drop.title, drop.updated_at, drop.id],
        )?;
        Ok(drop)
    })
    .await
}

/// Delete a drop together with its blocks and their gallery images.
pub async fn delete_drop(db: &Database, drop_id: &str) -> Result<DeleteDropResult, DropError> {
    let drop_id = drop_id.to_string();
    let result = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            let drop = load_drop(&tx, &drop_id)?;
            let blocks_removed = delete_blocks_of(&tx, &BlockParent::Drop(drop_id.clone()))?;
            tx.execute("DELETE FROM drops WHERE id = ?1", params![drop_id])?;
            tx.commit()?;
            Ok::<_, DropError>(DeleteDropResult {
                drop,
                blocks_removed,
            })
        })
        .await?;

    info!(
        "Deleted drop: {} ({} blocks)",
        result.drop.id, result.blocks_removed
    );
    Ok(result)
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
