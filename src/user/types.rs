//! User type definitions and error types.

use crate::db::DbError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Platform-wide role. Exactly one user holds `Owner` once the first
/// account exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformRole {
    User,
    Admin,
    Owner,
}

impl PlatformRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformRole::User => "user",
            PlatformRole::Admin => "admin",
            PlatformRole::Owner => "owner",
        }
    }

    /// Admins and the owner may moderate.
    #[must_use]
    pub fn is_staff(self) -> bool {
        matches!(self, PlatformRole::Admin | PlatformRole::Owner)
    }
}

impl fmt::Display for PlatformRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformRole {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(PlatformRole::User),
            "admin" => Ok(PlatformRole::Admin),
            "owner" => Ok(PlatformRole::Owner),
            other => Err(UserError::InvalidRole(other.to_string())),
        }
    }
}

impl ToSql for PlatformRole {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PlatformRole {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: UserError| FromSqlError::Other(Box::new(e)))
    }
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Unique login handle (lowercase, digits, `_` and `-`)
    pub username: String,
    pub display_name: String,
    pub role: PlatformRole,
    pub created_at: String,
    pub updated_at: String,
}

/// User-related errors
#[derive(Error, Debug)]
pub enum UserError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid role '{0}'. Use user, admin or owner")]
    InvalidRole(String),

    #[error("Only the platform owner can change roles")]
    NotOwner,

    #[error("The owner cannot step down without transferring ownership")]
    OwnerSelfDemotion,

    #[error("Ownership transfer failed and was rolled back: {0}")]
    TransferRolledBack(String),

    #[error("Ownership transfer failed and could not be rolled back: {0}")]
    TransferCritical(String),
}

/// Validate a username (3-32 chars, lowercase alphanumeric, `_` or `-`)
pub fn validate_username(username: &str) -> Result<(), UserError> {
    if username.len() < 3 || username.len() > 32 {
        return Err(UserError::InvalidUsername(
            "Username must be between 3 and 32 characters".to_string(),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(UserError::InvalidUsername(
            "Username must contain only lowercase letters, numbers, '-' and '_'".to_string(),
        ));
    }

    if username.starts_with('-') || username.starts_with('_') {
        return Err(UserError::InvalidUsername(
            "Username must start with a letter or number".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
