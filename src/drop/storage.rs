use super::types::{Drop, DropError};
use crate::db::optional;
use rusqlite::{params, Connection, Row};

pub(super) const DROP_COLUMNS: &str =
    "id, author_id, title, stream_id, uses_blocks, created_at, updated_at";

pub(super) fn row_to_drop(row: &Row<'_>) -> rusqlite::Result<Drop> {
    Ok(Drop {
        id: row.get(0)?,
        author_id: row.get(1)?,
        title: row.get(2)?,
        stream_id: row.get(3)?,
        uses_blocks: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn load_drop(conn: &Connection, drop_id: &str) -> Result<Drop, DropError> {
    let sql = format!("SELECT {DROP_COLUMNS} FROM drops WHERE id = ?1");
    optional(conn.query_row(&sql, params![drop_id], row_to_drop))?
        .ok_or_else(|| DropError::DropNotFound(drop_id.to_string()))
}
