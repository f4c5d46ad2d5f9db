use crate::db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Query parse error: {0}")]
    ParseError(String),

    #[error("Unknown search kind '{0}': expected stream, drop or asset")]
    UnknownKind(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}
