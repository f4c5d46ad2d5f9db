use super::{OrderingError, PositionedTable};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Position one past the current maximum, or 0 for an empty collection.
pub fn next_position(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
) -> Result<i64, OrderingError> {
    let sql = format!(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM {} WHERE {} = ?1",
        table.table, table.parent_column
    );
    Ok(conn.query_row(&sql, params![parent], |row| row.get(0))?)
}

/// Number of children under `parent`.
pub fn count(conn: &Connection, table: PositionedTable, parent: &str) -> Result<i64, OrderingError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1",
        table.table, table.parent_column
    );
    Ok(conn.query_row(&sql, params![parent], |row| row.get(0))?)
}

/// Child positions in ascending order.
pub fn positions(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
) -> Result<Vec<i64>, OrderingError> {
    let sql = format!(
        "SELECT position FROM {} WHERE {} = ?1 ORDER BY position",
        table.table, table.parent_column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![parent], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<i64>, _>>()?)
}

/// Child ids in position order.
pub fn list_ids(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
) -> Result<Vec<String>, OrderingError> {
    let sql = format!(
        "SELECT id FROM {} WHERE {} = ?1 ORDER BY position",
        table.table, table.parent_column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![parent], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<String>, _>>()?)
}

/// True when `positions` (sorted ascending) is exactly `0..len`.
#[must_use]
pub fn is_dense(positions: &[i64]) -> bool {
    positions
        .iter()
        .zip(0_i64..)
        .all(|(position, expected)| *position == expected)
}

/// Warn when a collection has drifted from the dense invariant.
pub fn log_if_sparse(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
) -> Result<(), OrderingError> {
    let found = positions(conn, table, parent)?;
    if !is_dense(&found) {
        warn!(
            table = table.table,
            parent = %parent,
            positions = ?found,
            "Positions are no longer dense"
        );
    }
    Ok(())
}

/// Shift every sibling at `position >= at` up by one.
pub fn open_gap(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
    at: i64,
) -> Result<usize, OrderingError> {
    // p -> -(p + 2) -> p + 1
    let stage = format!(
        "UPDATE {} SET position = -position - 2 WHERE {} = ?1 AND position >= ?2",
        table.table, table.parent_column
    );
    let moved = conn.execute(&stage, params![parent, at])?;
    let settle = format!(
        "UPDATE {} SET position = -position - 1 WHERE {} = ?1 AND position < 0",
        table.table, table.parent_column
    );
    conn.execute(&settle, params![parent])?;
    debug!(table = table.table, parent = %parent, at, moved, "Opened gap");
    Ok(moved)
}

/// Shift every sibling at `position > at` down by one.
pub fn close_gap(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
    at: i64,
) -> Result<usize, OrderingError> {
    // p -> -(p + 1) -> p - 1
    let stage = format!(
        "UPDATE {} SET position = -position - 1 WHERE {} = ?1 AND position > ?2",
        table.table, table.parent_column
    );
    let moved = conn.execute(&stage, params![parent, at])?;
    let settle = format!(
        "UPDATE {} SET position = -position - 2 WHERE {} = ?1 AND position < 0",
        table.table, table.parent_column
    );
    conn.execute(&settle, params![parent])?;
    debug!(table = table.table, parent = %parent, at, moved, "Closed gap");
    Ok(moved)
}

/// Pick the slot for a new child and make room for it.
///
/// `None` appends. `Some(k)` requires `0 <= k <= len` and shifts later
/// siblings up before the caller inserts at `k`.
pub fn resolve_insert_position(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
    requested: Option<i64>,
) -> Result<i64, OrderingError> {
    let Some(position) = requested else {
        return next_position(conn, table, parent);
    };
    let len = count(conn, table, parent)?;
    if position < 0 || position > len {
        return Err(OrderingError::InvalidPosition { position, len });
    }
    if position < len {
        open_gap(conn, table, parent, position)?;
    }
    Ok(position)
}

/// Delete `item_id` from `parent` and compact the siblings behind it.
///
/// Returns the position the item occupied.
pub fn remove_item(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
    item_id: &str,
) -> Result<i64, OrderingError> {
    let lookup = format!(
        "SELECT position FROM {} WHERE id = ?1 AND {} = ?2",
        table.table, table.parent_column
    );
    let position: i64 = crate::db::optional(
        conn.query_row(&lookup, params![item_id, parent], |row| row.get(0)),
    )?
    .ok_or_else(|| OrderingError::NotFound(item_id.to_string()))?;

    let delete = format!("DELETE FROM {} WHERE id = ?1", table.table);
    conn.execute(&delete, params![item_id])?;
    close_gap(conn, table, parent, position)?;
    Ok(position)
}

/// Check that `ordered` lists every id in `existing` exactly once.
pub fn validate_permutation(existing: &[String], ordered: &[String]) -> Result<(), OrderingError> {
    let existing_set: HashSet<&str> = existing.iter().map(String::as_str).collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(ordered.len());
    let mut duplicates = Vec::new();
    let mut unexpected = Vec::new();
    for id in ordered {
        if !seen.insert(id.as_str()) {
            duplicates.push(id.clone());
        } else if !existing_set.contains(id.as_str()) {
            unexpected.push(id.clone());
        }
    }

    let missing: Vec<String> = existing
        .iter()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() && unexpected.is_empty() && duplicates.is_empty() {
        Ok(())
    } else {
        Err(OrderingError::NotAPermutation {
            missing,
            unexpected,
            duplicates,
        })
    }
}

/// Assign each id the position of its index in `ordered`.
///
/// Validates `ordered` against the current children first; nothing is
/// written when validation fails.
pub fn apply_order(
    conn: &Connection,
    table: PositionedTable,
    parent: &str,
    ordered: &[String],
) -> Result<(), OrderingError> {
    let existing = list_ids(conn, table, parent)?;
    validate_permutation(&existing, ordered)?;

    let stage = format!(
        "UPDATE {} SET position = -position - 1 WHERE {} = ?1",
        table.table, table.parent_column
    );
    conn.execute(&stage, params![parent])?;

    let assign = format!(
        "UPDATE {} SET position = ?1 WHERE id = ?2 AND {} = ?3",
        table.table, table.parent_column
    );
    let mut stmt = conn.prepare(&assign)?;
    for (id, position) in ordered.iter().zip(0_i64..) {
        stmt.execute(params![position, id, parent])?;
    }
    debug!(table = table.table, parent = %parent, len = ordered.len(), "Applied order");
    Ok(())
}
