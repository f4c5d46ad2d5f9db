use super::types::{Bookmark, Stream, StreamError};
use crate::db::optional;
use rusqlite::{params, Connection, Row};

pub(super) const STREAM_COLUMNS: &str =
    "id, name, slug, description, creator_id, created_at, updated_at";

pub(super) const BOOKMARK_COLUMNS: &str =
    "id, stream_id, url, title, created_by, created_at, updated_at";

pub(super) fn row_to_stream(row: &Row<'_>) -> rusqlite::Result<Stream> {
    Ok(Stream {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        creator_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(super) fn row_to_bookmark(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        stream_id: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        created_by: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn load_stream(conn: &Connection, stream_id: &str) -> Result<Stream, StreamError> {
    let sql = format!("SELECT {STREAM_COLUMNS} FROM streams WHERE id = ?1");
    optional(conn.query_row(&sql, params![stream_id], row_to_stream))?
        .ok_or_else(|| StreamError::StreamNotFound(stream_id.to_string()))
}

pub(super) fn find_stream_by_slug(conn: &Connection, slug: &str) -> rusqlite::Result<Option<Stream>> {
    let sql = format!("SELECT {STREAM_COLUMNS} FROM streams WHERE slug = ?1");
    optional(conn.query_row(&sql, params![slug], row_to_stream))
}

pub(super) fn count_assets(conn: &Connection, stream_id: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM stream_assets WHERE stream_id = ?1",
        params![stream_id],
        |row| row.get(0),
    )
}

pub(super) fn count_members(conn: &Connection, stream_id: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM stream_members WHERE stream_id = ?1",
        params![stream_id],
        |row| row.get(0),
    )
}

pub(super) fn member_ids(conn: &Connection, stream_id: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT user_id FROM stream_members WHERE stream_id = ?1 ORDER BY joined_at, user_id",
    )?;
    let rows = stmt.query_map(params![stream_id], |row| row.get(0))?;
    rows.collect()
}

/// `INSERT OR IGNORE` a membership. Returns true when a row was added.
pub(super) fn insert_member(
    conn: &Connection,
    stream_id: &str,
    user_id: &str,
    joined_at: &str,
) -> rusqlite::Result<bool> {
    let added = conn.execute(
        "INSERT OR IGNORE INTO stream_members (stream_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
        params![stream_id, user_id, joined_at],
    )?;
    Ok(added > 0)
}
