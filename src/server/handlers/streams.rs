use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ensure_member, Page};
use crate::server::extract::{ApiJson, AuthUser};
use crate::server::structured_error::ApiError;
use crate::server::AppState;
use crate::stream::{
    add_asset_to_stream, create_bookmark, create_stream, delete_bookmark, delete_stream,
    follow_stream, get_stream, get_stream_summary, list_bookmarks, list_members,
    list_stream_assets, list_streams, remove_asset_from_stream, unfollow_stream, update_bookmark,
    Bookmark, CreateBookmarkOptions, CreateStreamOptions, StreamAsset, StreamMember,
    StreamSummary, UpdateBookmarkOptions,
};

#[derive(Debug, Deserialize)]
pub struct CreateStreamRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssetRequest {
    pub asset_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BookmarkRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(page): Query<Page>,
) -> Result<Json<Vec<StreamSummary>>, ApiError> {
    let streams = list_streams(&state.db, page.limit_or(50), page.offset()).await?;
    Ok(Json(streams))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<CreateStreamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stream = create_stream(
        &state.db,
        CreateStreamOptions {
            creator_id: user.id,
            name: req.name,
            description: req.description,
        },
    )
    .await?;
    let summary = get_stream_summary(&state.db, &stream.id).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StreamSummary>, ApiError> {
    Ok(Json(get_stream_summary(&state.db, &id).await?))
}

/// Creator or staff only.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let stream = get_stream(&state.db, &id).await?;
    if stream.creator_id != user.0.id {
        user.require_staff()?;
    }
    delete_stream(&state.db, &id).await?;
    Ok(Json(json!({ "deleted": id })))
}

pub async fn members(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<StreamMember>>, ApiError> {
    Ok(Json(list_members(&state.db, &id).await?))
}

pub async fn follow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StreamMember>, ApiError> {
    Ok(Json(follow_stream(&state.db, &id, &user.id).await?))
}

pub async fn unfollow(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    unfollow_stream(&state.db, &id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn assets(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<StreamAsset>>, ApiError> {
    Ok(Json(list_stream_assets(&state.db, &id).await?))
}

pub async fn tag_asset(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TagAssetRequest>,
) -> Result<Json<StreamAsset>, ApiError> {
    ensure_member(&state, &user, &id).await?;
    let tagged = add_asset_to_stream(&state.db, &id, &req.asset_id, &user.0.id).await?;
    Ok(Json(tagged))
}

pub async fn untag_asset(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, asset_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    ensure_member(&state, &user, &id).await?;
    let removed = remove_asset_from_stream(&state.db, &id, &asset_id).await?;
    Ok(Json(json!({ "removed": removed })))
}

pub async fn bookmarks(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    Ok(Json(list_bookmarks(&state.db, &id).await?))
}

pub async fn add_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<BookmarkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_member(&state, &user, &id).await?;
    let url = req
        .url
        .ok_or_else(|| ApiError::validation("url is required"))?;
    let bookmark = create_bookmark(
        &state.db,
        &id,
        CreateBookmarkOptions {
            url,
            title: req.title,
            created_by: user.0.id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

pub async fn edit_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, bookmark_id)): Path<(String, String)>,
    ApiJson(req): ApiJson<BookmarkRequest>,
) -> Result<Json<Bookmark>, ApiError> {
    ensure_member(&state, &user, &id).await?;
    let bookmark = update_bookmark(
        &state.db,
        &id,
        &bookmark_id,
        UpdateBookmarkOptions {
            url: req.url,
            title: req.title,
        },
    )
    .await?;
    Ok(Json(bookmark))
}

pub async fn remove_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, bookmark_id)): Path<(String, String)>,
) -> Result<Json<Bookmark>, ApiError> {
    ensure_member(&state, &user, &id).await?;
    Ok(Json(delete_bookmark(&state.db, &id, &bookmark_id).await?))
}
