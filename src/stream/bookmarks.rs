//! Bookmarks attached to a stream.

use super::storage::{load_stream, row_to_bookmark, BOOKMARK_COLUMNS};
use super::types::{validate_bookmark_url, Bookmark, StreamError};
use crate::db::{optional, Database};
use crate::utils::{new_id, now_iso};
use rusqlite::{params, Connection};
use tracing::info;

/// Options for creating a bookmark
#[derive(Debug, Clone)]
pub struct CreateBookmarkOptions {
    pub url: String,
    pub title: Option<String>,
    pub created_by: String,
}

/// Fields to change on a bookmark; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateBookmarkOptions {
    pub url: Option<String>,
    pub title: Option<String>,
}

fn clean_title(title: Option<String>) -> Option<String> {
    title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn load_bookmark(conn: &Connection, stream_id: &str, bookmark_id: &str) -> Result<Bookmark, StreamError> {
    let sql = format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = ?1 AND stream_id = ?2");
    optional(conn.query_row(&sql, params![bookmark_id, stream_id], row_to_bookmark))?
        .ok_or_else(|| StreamError::BookmarkNotFound(bookmark_id.to_string()))
}

pub async fn create_bookmark(
    db: &Database,
    stream_id: &str,
    options: CreateBookmarkOptions,
) -> Result<Bookmark, StreamError> {
    let now = now_iso();
    let bookmark = Bookmark {
        id: new_id(),
        stream_id: stream_id.to_string(),
        url: validate_bookmark_url(&options.url)?,
        title: clean_title(options.title),
        created_by: options.created_by,
        created_at: now.clone(),
        updated_at: now,
    };
    let row = bookmark.clone();
    db.call(move |conn| {
        load_stream(conn, &row.stream_id)?;
        conn.execute(
            "INSERT INTO bookmarks (id, stream_id, url, title, created_by, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.stream_id,
                row.url,
                row.title,
                row.created_by,
                row.created_at,
                row.updated_at
            ],
        )?;
        Ok::<_, StreamError>(())
    })
    .await?;

    info!("Created bookmark {} in stream {}", bookmark.id, bookmark.stream_id);
    Ok(bookmark)
}

/// Bookmarks of a stream, oldest first.
pub async fn list_bookmarks(db: &Database, stream_id: &str) -> Result<Vec<Bookmark>, StreamError> {
    let stream_id = stream_id.to_string();
    db.call(move |conn| {
        load_stream(conn, &stream_id)?;
        let sql = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE stream_id = ?1 ORDER BY created_at, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![stream_id], row_to_bookmark)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}

pub async fn update_bookmark(
    db: &Database,
    stream_id: &str,
    bookmark_id: &str,
    options: UpdateBookmarkOptions,
) -> Result<Bookmark, StreamError> {
    let url = options.url.as_deref().map(validate_bookmark_url).transpose()?;
    let stream_id = stream_id.to_string();
    let bookmark_id = bookmark_id.to_string();
    db.call(move |conn| {
        let mut bookmark = load_bookmark(conn, &stream_id, &bookmark_id)?;
        if let Some(url) = url {
            bookmark.url = url;
        }
        if options.title.is_some() {
            bookmark.title = clean_title(options.title);
        }
        bookmark.updated_at = now_iso();
        conn.execute(
            "UPDATE bookmarks SET url = ?1, title = ?2, updated_at = ?3 WHERE id = ?4",
            params![bookmark.url, bookmark.title, bookmark.updated_at, bookmark.id],
        )?;
        Ok(bookmark)
    })
    .await
}

pub async fn delete_bookmark(
    db: &Database,
    stream_id: &str,
    bookmark_id: &str,
) -> Result<Bookmark, StreamError> {
    let stream_id = stream_id.to_string();
    let bookmark_id = bookmark_id.to_string();
    db.call(move |conn| {
        let bookmark = load_bookmark(conn, &stream_id, &bookmark_id)?;
        conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![bookmark.id])?;
        Ok(bookmark)
    })
    .await
}
