pub mod admin;
pub mod assets;
pub mod auth;
pub mod blocks;
pub mod drops;
pub mod gallery;
pub mod notifications;
pub mod search;
pub mod streams;

use serde::Deserialize;

use super::extract::AuthUser;
use super::structured_error::ApiError;
use super::AppState;
use crate::block::BlockParent;
use crate::drop::get_drop;
use crate::stream::{get_stream, list_members};

/// `?limit=&offset=` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl Page {
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.filter(|l| *l > 0).unwrap_or(default)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Staff may edit anything; otherwise only the drop author or the stream
/// creator may change a block list.
pub async fn ensure_can_edit(
    state: &AppState,
    user: &AuthUser,
    parent: &BlockParent,
) -> Result<(), ApiError> {
    if user.0.role.is_staff() {
        return Ok(());
    }
    let owner_id = match parent {
        BlockParent::Drop(id) => get_drop(&state.db, id).await?.author_id,
        BlockParent::Stream(id) => get_stream(&state.db, id).await?.creator_id,
    };
    if owner_id == user.0.id {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Only the owner of {parent} or an admin can change it"
        )))
    }
}

/// Staff always pass; otherwise the user must follow the stream.
pub async fn ensure_member(
    state: &AppState,
    user: &AuthUser,
    stream_id: &str,
) -> Result<(), ApiError> {
    if user.0.role.is_staff() {
        return Ok(());
    }
    let members = list_members(&state.db, stream_id).await?;
    if members.iter().any(|m| m.user_id == user.0.id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Follow the stream first"))
    }
}
