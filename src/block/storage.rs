use super::types::{Block, BlockContent, BlockError, BlockParent};
use crate::db::optional;
use crate::ordering::PositionedTable;
use rusqlite::{params, Connection, Row};

/// Blocks are ordered per `parent_key` (`drop:<id>` / `stream:<id>`).
pub const BLOCKS: PositionedTable = PositionedTable::new("blocks", "parent_key");

pub(super) const BLOCK_COLUMNS: &str =
    "id, parent_kind, parent_id, position, payload, created_at, updated_at";

pub(super) fn row_to_block(row: &Row<'_>) -> rusqlite::Result<Block> {
    let payload: String = row.get(4)?;
    let content: BlockContent = serde_json::from_str(&payload).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Block {
        id: row.get(0)?,
        parent_kind: row.get(1)?,
        parent_id: row.get(2)?,
        position: row.get(3)?,
        content,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Fail with `ParentNotFound` unless the drop or stream exists.
pub(super) fn ensure_parent(conn: &Connection, parent: &BlockParent) -> Result<(), BlockError> {
    let sql = match parent {
        BlockParent::Drop(_) => "SELECT EXISTS(SELECT 1 FROM drops WHERE id = ?1)",
        BlockParent::Stream(_) => "SELECT EXISTS(SELECT 1 FROM streams WHERE id = ?1)",
    };
    let exists: bool = conn.query_row(sql, params![parent.id()], |row| row.get(0))?;
    if exists {
        Ok(())
    } else {
        Err(BlockError::ParentNotFound(parent.to_string()))
    }
}

/// Load a block that must belong to `parent`.
pub(super) fn load_block(
    conn: &Connection,
    parent: &BlockParent,
    block_id: &str,
) -> Result<Block, BlockError> {
    let sql = format!("SELECT {BLOCK_COLUMNS} FROM blocks WHERE id = ?1 AND parent_key = ?2");
    optional(conn.query_row(&sql, params![block_id, parent.key()], row_to_block))?
        .ok_or_else(|| BlockError::BlockNotFound(block_id.to_string()))
}

/// Load a block regardless of parent.
pub fn find_block(conn: &Connection, block_id: &str) -> rusqlite::Result<Option<Block>> {
    let sql = format!("SELECT {BLOCK_COLUMNS} FROM blocks WHERE id = ?1");
    optional(conn.query_row(&sql, params![block_id], row_to_block))
}

pub(super) fn select_blocks(
    conn: &Connection,
    parent: &BlockParent,
) -> rusqlite::Result<Vec<Block>> {
    let sql = format!("SELECT {BLOCK_COLUMNS} FROM blocks WHERE parent_key = ?1 ORDER BY position");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![parent.key()], row_to_block)?;
    rows.collect()
}

pub(super) fn insert_block_row(conn: &Connection, parent: &BlockParent, block: &Block) -> Result<(), BlockError> {
    let payload = serde_json::to_string(&block.content)?;
    conn.execute(
        "INSERT INTO blocks (id, parent_key, parent_kind, parent_id, position, kind, payload, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            block.id,
            parent.key(),
            parent.kind(),
            parent.id(),
            block.position,
            block.content.kind().as_str(),
            payload,
            block.created_at,
            block.updated_at,
        ],
    )?;
    Ok(())
}

/// Delete every block of `parent`. Gallery images go with them via the
/// foreign key. Returns the number of blocks removed.
pub fn delete_blocks_of(conn: &Connection, parent: &BlockParent) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM blocks WHERE parent_key = ?1",
        params![parent.key()],
    )
}
