use thiserror::Error;

/// Errors raised while maintaining positions.
#[derive(Error, Debug)]
pub enum OrderingError {
    #[error("Item '{0}' not found in this collection")]
    NotFound(String),

    #[error("Position {position} is out of range for a collection of {len} items")]
    InvalidPosition { position: i64, len: i64 },

    #[error(
        "Order must list every item exactly once (missing: {missing:?}, unexpected: {unexpected:?}, duplicated: {duplicates:?})"
    )]
    NotAPermutation {
        missing: Vec<String>,
        unexpected: Vec<String>,
        duplicates: Vec<String>,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
