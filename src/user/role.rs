//! Platform role changes, including ownership transfer.
//!
//! Promoting someone to owner is two writes: demote the current owner to
//! admin, then promote the target. Both run in one transaction. If the
//! promotion fails the transaction is rolled back explicitly so the caller
//! learns whether the original owner was restored; a failed rollback is
//! reported as [`UserError::TransferCritical`] because the platform may
//! be left without an owner.

use super::storage::{load_user, set_role};
use super::types::{PlatformRole, User, UserError};
use crate::db::{immediate, Database};
use crate::notification::{insert_notification, NotificationKind};
use crate::utils::now_iso;
use serde::Serialize;
use tracing::{error, info, warn};

/// Result of a role change
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeResult {
    pub user: User,
    pub previous_role: PlatformRole,
    /// The former owner, when ownership moved
    pub demoted_owner: Option<User>,
}

/// Change `target_id`'s platform role on behalf of `actor_id`.
pub async fn change_role(
    db: &Database,
    actor_id: &str,
    target_id: &str,
    new_role: PlatformRole,
) -> Result<RoleChangeResult, UserError> {
    let actor_id = actor_id.to_string();
    let target_id = target_id.to_string();

    let result = db
        .call(move |conn| {
            let actor = load_user(conn, &actor_id)?;
            if actor.role != PlatformRole::Owner {
                return Err(UserError::NotOwner);
            }
            let target = load_user(conn, &target_id)?;
            let previous_role = target.role;

            if target.id == actor.id {
                if new_role == PlatformRole::Owner {
                    return Ok(RoleChangeResult {
                        user: target,
                        previous_role,
                        demoted_owner: None,
                    });
                }
                return Err(UserError::OwnerSelfDemotion);
            }

            let now = now_iso();
            let tx = immediate(conn)?;

            if new_role != PlatformRole::Owner {
                set_role(&tx, &target.id, new_role, &now)?;
                notify_role(&tx, &target.id, new_role)?;
                let user = load_user(&tx, &target.id)?;
                tx.commit()?;
                return Ok(RoleChangeResult {
                    user,
                    previous_role,
                    demoted_owner: None,
                });
            }

            if set_role(&tx, &actor.id, PlatformRole::Admin, &now)? != 1 {
                return Err(UserError::UserNotFound(actor.id));
            }

            let promoted = set_role(&tx, &target.id, PlatformRole::Owner, &now)
                .map_err(|e| e.to_string())
                .and_then(|changed| {
                    if changed == 1 {
                        Ok(())
                    } else {
                        Err(format!("target '{}' disappeared during transfer", target.id))
                    }
                })
                .and_then(|()| {
                    notify_role(&tx, &target.id, PlatformRole::Owner).map_err(|e| e.to_string())
                });

            if let Err(reason) = promoted {
                return Err(settle_failed_transfer(reason, tx.rollback()));
            }

            let user = load_user(&tx, &target.id)?;
            let demoted_owner = load_user(&tx, &actor.id)?;
            tx.commit()?;
            Ok(RoleChangeResult {
                user,
                previous_role,
                demoted_owner: Some(demoted_owner),
            })
        })
        .await?;

    match &result.demoted_owner {
        Some(former) => info!(
            "Ownership transferred from {} to {}",
            former.username, result.user.username
        ),
        None => info!(
            "Role of {} changed from {} to {}",
            result.user.username, result.previous_role, result.user.role
        ),
    }
    Ok(result)
}

fn notify_role(
    conn: &rusqlite::Connection,
    user_id: &str,
    role: PlatformRole,
) -> rusqlite::Result<()> {
    insert_notification(
        conn,
        user_id,
        NotificationKind::RoleChanged,
        &format!("Your platform role is now {role}"),
        None,
    )?;
    Ok(())
}

/// Classify a failed promotion by whether the compensating rollback held.
pub(crate) fn settle_failed_transfer(reason: String, rollback: rusqlite::Result<()>) -> UserError {
    match rollback {
        Ok(()) => {
            warn!("Ownership transfer rolled back: {reason}");
            UserError::TransferRolledBack(reason)
        }
        Err(rollback_err) => {
            error!(
                "CRITICAL: ownership transfer failed ({reason}) and rollback failed ({rollback_err}); platform may have no owner"
            );
            UserError::TransferCritical(format!("{reason}; rollback failed: {rollback_err}"))
        }
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod role_tests;
