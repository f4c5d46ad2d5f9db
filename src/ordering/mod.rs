//! Dense, zero-based ordering for child rows of a parent.
//!
//! Drop blocks, stream blocks and gallery images all keep an integer
//! `position` that is unique per parent and, after every completed
//! operation, covers exactly `0..N`. The helpers here are table-agnostic:
//! callers describe the table with a [`PositionedTable`] and run the
//! helpers inside their own transaction.
//!
//! Range shifts go through a negative staging range so the
//! `UNIQUE(parent, position)` constraint never sees two rows on the same
//! slot mid-statement.

mod error;
mod positions;

pub use error::OrderingError;
pub use positions::{
    apply_order, close_gap, count, is_dense, list_ids, log_if_sparse, next_position, open_gap,
    positions, remove_item, resolve_insert_position, validate_permutation,
};

/// Describes a table whose rows carry `id`, a parent key column and `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedTable {
    pub table: &'static str,
    pub parent_column: &'static str,
}

impl PositionedTable {
    #[must_use]
    pub const fn new(table: &'static str, parent_column: &'static str) -> Self {
        Self {
            table,
            parent_column,
        }
    }
}
