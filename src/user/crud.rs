//! User CRUD operations.

use super::storage::{find_owner, find_user_by_username, insert_user, load_user, row_to_user, USER_COLUMNS};
use super::types::{validate_username, PlatformRole, User, UserError};
use crate::db::{immediate, Database};
use crate::utils::{new_id, now_iso};
use rusqlite::params;
use tracing::info;

/// Options for registering a user
pub struct RegisterUserOptions {
    pub username: String,
    pub display_name: Option<String>,
}

/// Register a new account. The first account on a fresh platform becomes
/// the owner.
pub async fn register_user(db: &Database, options: RegisterUserOptions) -> Result<User, UserError> {
    let username = options.username.trim().to_lowercase();
    validate_username(&username)?;
    let display_name = options
        .display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| username.clone());

    let user = db
        .call(move |conn| {
            let tx = immediate(conn)?;
            if find_user_by_username(&tx, &username)?.is_some() {
                return Err(UserError::UsernameTaken(username));
            }
            let role = if find_owner(&tx)?.is_some() {
                PlatformRole::User
            } else {
                PlatformRole::Owner
            };
            let now = now_iso();
            let user = User {
                id: new_id(),
                username,
                display_name,
                role,
                created_at: now.clone(),
                updated_at: now,
            };
            insert_user(&tx, &user)?;
            tx.commit()?;
            Ok(user)
        })
        .await?;

    info!("Registered user: {} ({})", user.username, user.role);
    Ok(user)
}

/// Get a user by id
pub async fn get_user(db: &Database, user_id: &str) -> Result<User, UserError> {
    let user_id = user_id.to_string();
    db.call(move |conn| load_user(conn, &user_id)).await
}

/// Get a user by username
pub async fn get_user_by_username(db: &Database, username: &str) -> Result<User, UserError> {
    let username = username.trim().to_lowercase();
    db.call(move |conn| {
        find_user_by_username(conn, &username)?.ok_or(UserError::UserNotFound(username))
    })
    .await
}

/// List users ordered by username
pub async fn list_users(db: &Database, limit: i64, offset: i64) -> Result<Vec<User>, UserError> {
    db.call(move |conn| {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username LIMIT ?1 OFFSET ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit, offset], row_to_user)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_user_becomes_owner() {
        let db = Database::open_in_memory().unwrap();
        let first = register_user(
            &db,
            RegisterUserOptions {
                username: "Ana".to_string(),
                display_name: None,
            },
        )
        .await
        .unwrap();
        let second = register_user(
            &db,
            RegisterUserOptions {
                username: "ben".to_string(),
                display_name: Some("Ben B".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(first.role, PlatformRole::Owner);
        assert_eq!(first.username, "ana");
        assert_eq!(first.display_name, "ana");
        assert_eq!(second.role, PlatformRole::User);
        assert_eq!(second.display_name, "Ben B");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::open_in_memory().unwrap();
        let options = || RegisterUserOptions {
            username: "ana".to_string(),
            display_name: None,
        };
        register_user(&db, options()).await.unwrap();
        let err = register_user(&db, options()).await.unwrap_err();
        assert!(matches!(err, UserError::UsernameTaken(u) if u == "ana"));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = get_user(&db, "missing").await.unwrap_err();
        assert!(matches!(err, UserError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_users_sorted() {
        let db = Database::open_in_memory().unwrap();
        for name in ["zed", "amy", "max"] {
            register_user(
                &db,
                RegisterUserOptions {
                    username: name.to_string(),
                    display_name: None,
                },
            )
            .await
            .unwrap();
        }
        let users = list_users(&db, 10, 0).await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["amy", "max", "zed"]);
        assert_eq!(get_user_by_username(&db, "MAX").await.unwrap().username, "max");
    }
}
