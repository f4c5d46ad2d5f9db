//! Staff-only moderation endpoints under `/admin`.

use axum::extract::{Path, Query, State};
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::Page;
use crate::drop::{delete_drop, DeleteDropResult};
use crate::metrics::OperationTimer;
use crate::server::extract::{ApiJson, AuthUser, RequestId};
use crate::server::structured_error::ApiError;
use crate::server::AppState;
use crate::stream::{merge_streams, rename_stream, MergeResult, RenameOutcome, Stream};
use crate::user::{change_role, list_users, PlatformRole, RoleChangeResult, User};

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    #[serde(alias = "sourceId")]
    pub source_id: String,
    #[serde(alias = "targetId")]
    pub target_id: String,
}

pub async fn users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<User>>, ApiError> {
    user.require_staff()?;
    Ok(Json(list_users(&state.db, page.limit_or(50), page.offset()).await?))
}

/// Change a user's role. Only the owner may do this; naming a new owner
/// demotes the current one in the same transaction.
#[instrument(
    name = "http.change_role",
    skip(state, request_id, actor, req),
    fields(request_id = %request_id.0)
)]
pub async fn set_role(
    State(state): State<AppState>,
    request_id: RequestId,
    actor: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<Json<RoleChangeResult>, ApiError> {
    let _timer = OperationTimer::new("change_role").with_request_id(request_id.0.clone());
    actor.require_staff()?;
    let role: PlatformRole = req.role.parse()?;
    let result = change_role(&state.db, &actor.0.id, &id, role).await?;
    Ok(Json(result))
}

pub async fn rename(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RenameRequest>,
) -> Result<Json<Stream>, ApiError> {
    user.require_staff()?;
    match rename_stream(&state.db, &id, &req.name).await? {
        RenameOutcome::Renamed(stream) => Ok(Json(stream)),
        RenameOutcome::NameConflict(existing) => Err(ApiError::new(
            StatusCode::CONFLICT,
            "NAME_CONFLICT",
            format!("A stream named '{}' already exists", existing.name),
        )
        .with_tip("Merge the two streams instead of renaming")
        .with_detail(
            "conflict",
            json!({ "id": existing.id, "name": existing.name, "slug": existing.slug }),
        )),
    }
}

#[instrument(
    name = "http.merge_streams",
    skip(state, request_id, user, req),
    fields(request_id = %request_id.0)
)]
pub async fn merge(
    State(state): State<AppState>,
    request_id: RequestId,
    user: AuthUser,
    ApiJson(req): ApiJson<MergeRequest>,
) -> Result<Json<MergeResult>, ApiError> {
    let _timer = OperationTimer::new("merge_streams").with_request_id(request_id.0.clone());
    user.require_staff()?;
    let result = merge_streams(&state.db, &req.source_id, &req.target_id).await?;
    info!(
        actor = %user.0.id,
        source = %req.source_id,
        target = %req.target_id,
        "Streams merged by staff"
    );
    Ok(Json(result))
}

pub async fn remove_drop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteDropResult>, ApiError> {
    user.require_staff()?;
    Ok(Json(delete_drop(&state.db, &id).await?))
}
