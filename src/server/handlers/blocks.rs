//! Block list handlers, mounted under both `/drops/{id}/blocks` and
//! `/streams/{id}/blocks`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::ensure_can_edit;
use crate::block::{
    delete_block, insert_block, list_blocks, reorder_blocks, update_block, Block, BlockContent,
    InsertBlockOptions,
};
use crate::metrics::OperationTimer;
use crate::server::extract::{ApiJson, AuthUser, ParentPath, RequestId};
use crate::server::structured_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct InsertBlockRequest {
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(flatten)]
    pub content: BlockContent,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    path: ParentPath,
) -> Result<Json<Vec<Block>>, ApiError> {
    Ok(Json(list_blocks(&state.db, &path.parent).await?))
}

#[instrument(
    name = "http.insert_block",
    skip(state, request_id, user, path, req),
    fields(request_id = %request_id.0, parent = %path.parent)
)]
pub async fn insert(
    State(state): State<AppState>,
    request_id: RequestId,
    user: AuthUser,
    path: ParentPath,
    ApiJson(req): ApiJson<InsertBlockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _timer = OperationTimer::new("insert_block").with_request_id(request_id.0.clone());
    ensure_can_edit(&state, &user, &path.parent).await?;
    let block = insert_block(
        &state.db,
        &path.parent,
        InsertBlockOptions {
            content: req.content,
            position: req.position,
            max_blocks: Some(state.config.limits.max_blocks_per_parent),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(block)))
}

#[instrument(
    name = "http.reorder_blocks",
    skip(state, request_id, user, path, req),
    fields(request_id = %request_id.0, parent = %path.parent)
)]
pub async fn reorder(
    State(state): State<AppState>,
    request_id: RequestId,
    user: AuthUser,
    path: ParentPath,
    ApiJson(req): ApiJson<ReorderRequest>,
) -> Result<Json<Vec<Block>>, ApiError> {
    let _timer = OperationTimer::new("reorder_blocks").with_request_id(request_id.0.clone());
    ensure_can_edit(&state, &user, &path.parent).await?;
    Ok(Json(reorder_blocks(&state.db, &path.parent, req.order).await?))
}

/// Replace a block's payload. The kind must stay the same.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    path: ParentPath,
    ApiJson(content): ApiJson<BlockContent>,
) -> Result<Json<Block>, ApiError> {
    ensure_can_edit(&state, &user, &path.parent).await?;
    let block_id = path.param("block_id")?;
    Ok(Json(update_block(&state.db, &path.parent, block_id, content).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    path: ParentPath,
) -> Result<Json<Value>, ApiError> {
    let _timer = OperationTimer::new("delete_block");
    ensure_can_edit(&state, &user, &path.parent).await?;
    let block = delete_block(&state.db, &path.parent, path.param("block_id")?).await?;
    Ok(Json(json!({ "deleted": block.id })))
}
