//! Stream CRUD and rename.

use super::storage::{
    count_assets, count_members, find_stream_by_slug, insert_member, load_stream, row_to_stream,
    STREAM_COLUMNS,
};
use super::types::{name_and_slug, RenameOutcome, Stream, StreamError, StreamSummary};
use crate::block::{delete_blocks_of, BlockParent};
use crate::db::{immediate, is_unique_violation, Database};
use crate::utils::{new_id, now_iso};
use rusqlite::params;
use tracing::{info, warn};

/// Options for creating a stream
#[derive(Debug, Clone)]
pub struct CreateStreamOptions {
    pub creator_id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Create a stream. The creator becomes its first member.
pub async fn create_stream(
    db: &Database,
    options: CreateStreamOptions,
) -> Result<Stream, StreamError> {
    let (name, slug) = name_and_slug(&options.name)?;
    let now = now_iso();
    let stream = Stream {
        id: new_id(),
        name,
        slug,
        description: options
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        creator_id: options.creator_id,
        created_at: now.clone(),
        updated_at: now,
    };

    let row = stream.clone();
    db.call(move |conn| {
        let tx = immediate(conn)?;
        let inserted = tx.execute(
            "INSERT INTO streams (id, name, slug, description, creator_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.name,
                row.slug,
                row.description,
                row.creator_id,
                row.created_at,
                row.updated_at
            ],
        );
        match inserted {
            Err(e) if is_unique_violation(&e) => return Err(StreamError::SlugTaken(row.slug)),
            other => other?,
        };
        insert_member(&tx, &row.id, &row.creator_id, &row.created_at)?;
        tx.commit()?;
        Ok(())
    })
    .await?;

    info!("Created stream: {} ({})", stream.slug, stream.id);
    Ok(stream)
}

pub async fn get_stream(db: &Database, stream_id: &str) -> Result<Stream, StreamError> {
    let stream_id = stream_id.to_string();
    db.call(move |conn| load_stream(conn, &stream_id)).await
}

pub async fn get_stream_by_slug(db: &Database, slug: &str) -> Result<Stream, StreamError> {
    let slug = slug.to_string();
    db.call(move |conn| {
        find_stream_by_slug(conn, &slug)?.ok_or(StreamError::StreamNotFound(slug))
    })
    .await
}

/// Load a stream with its derived counts.
///
/// The row and both counts are fetched concurrently.
pub async fn get_stream_summary(
    db: &Database,
    stream_id: &str,
) -> Result<StreamSummary, StreamError> {
    let (id_a, id_b) = (stream_id.to_string(), stream_id.to_string());
    let (stream, asset_count, member_count) = futures::try_join!(
        get_stream(db, stream_id),
        db.call(move |conn| Ok::<_, StreamError>(count_assets(conn, &id_a)?)),
        db.call(move |conn| Ok::<_, StreamError>(count_members(conn, &id_b)?)),
    )?;
    Ok(StreamSummary {
        stream,
        asset_count,
        member_count,
    })
}

/// List streams by name with their counts.
pub async fn list_streams(
    db: &Database,
    limit: i64,
    offset: i64,
) -> Result<Vec<StreamSummary>, StreamError> {
    let limit = if limit > 0 { limit } else { 50 };
    let streams = db
        .call(move |conn| {
            let sql = format!(
                "SELECT {STREAM_COLUMNS} FROM streams ORDER BY name COLLATE NOCASE, id \
                 LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![limit, offset], row_to_stream)?;
            Ok::<_, StreamError>(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await?;

    let summaries = futures::future::try_join_all(streams.into_iter().map(|stream| async move {
        let (id_a, id_b) = (stream.id.clone(), stream.id.clone());
        let (asset_count, member_count) = futures::try_join!(
            db.call(move |conn| Ok::<_, StreamError>(count_assets(conn, &id_a)?)),
            db.call(move |conn| Ok::<_, StreamError>(count_members(conn, &id_b)?)),
        )?;
        Ok::<_, StreamError>(StreamSummary {
            stream,
            asset_count,
            member_count,
        })
    }))
    .await?;
    Ok(summaries)
}

/// Rename a stream.
///
/// When another stream already owns the new slug, nothing is written and
/// that stream is returned as [`RenameOutcome::NameConflict`].
pub async fn rename_stream(
    db: &Database,
    stream_id: &str,
    new_name: &str,
) -> Result<RenameOutcome, StreamError> {
    let (name, slug) = name_and_slug(new_name)?;
    let stream_id = stream_id.to_string();
    let outcome = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            let mut stream = load_stream(&tx, &stream_id)?;
            if let Some(other) = find_stream_by_slug(&tx, &slug)?.filter(|s| s.id != stream.id) {
                return Ok(RenameOutcome::NameConflict(other));
            }
            stream.name = name;
            stream.slug = slug;
            stream.updated_at = now_iso();
            tx.execute(
                "UPDATE streams SET name = ?1, slug = ?2, updated_at = ?3 WHERE id = ?4",
                params![stream.name, stream.slug, stream.updated_at, stream.id],
            )?;
            tx.commit()?;
            Ok::<_, StreamError>(RenameOutcome::Renamed(stream))
        })
        .await?;

    match &outcome {
        RenameOutcome::Renamed(stream) => info!("Renamed stream {} to '{}'", stream.id, stream.name),
        RenameOutcome::NameConflict(other) => {
            warn!("Rename rejected: slug '{}' belongs to stream {}", other.slug, other.id);
        }
    }
    Ok(outcome)
}

/// Delete a stream with its blocks, memberships, asset tags and bookmarks.
/// Drops filed under it are kept and lose their stream.
pub async fn delete_stream(db: &Database, stream_id: &str) -> Result<Stream, StreamError> {
    let stream_id = stream_id.to_string();
    let stream = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            let stream = load_stream(&tx, &stream_id)?;
            delete_blocks_of(&tx, &BlockParent::Stream(stream_id.clone()))?;
            tx.execute("DELETE FROM streams WHERE id = ?1", params![stream_id])?;
            tx.commit()?;
            Ok::<_, StreamError>(stream)
        })
        .await?;

    info!("Deleted stream: {} ({})", stream.slug, stream.id);
    Ok(stream)
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
