//! User rows.

use super::types::{PlatformRole, User, UserError};
use crate::db::optional;
use rusqlite::{params, Connection, Row};

pub(crate) const USER_COLUMNS: &str = "id, username, display_name, role, created_at, updated_at";

pub(crate) fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Fetch a user or fail with `UserNotFound`.
pub fn load_user(conn: &Connection, user_id: &str) -> Result<User, UserError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    optional(conn.query_row(&sql, params![user_id], row_to_user))?
        .ok_or_else(|| UserError::UserNotFound(user_id.to_string()))
}

pub fn find_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>, UserError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
    Ok(optional(conn.query_row(&sql, params![username], row_to_user))?)
}

pub fn find_owner(conn: &Connection) -> Result<Option<User>, UserError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE role = 'owner' LIMIT 1");
    Ok(optional(conn.query_row(&sql, [], row_to_user))?)
}

pub fn insert_user(conn: &Connection, user: &User) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO users (id, username, display_name, role, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.username,
            user.display_name,
            user.role,
            user.created_at,
            user.updated_at,
        ],
    )?;
    Ok(())
}

/// Set `role` on `user_id`. Returns the number of rows changed.
pub fn set_role(
    conn: &Connection,
    user_id: &str,
    role: PlatformRole,
    updated_at: &str,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
        params![role, updated_at, user_id],
    )
}
