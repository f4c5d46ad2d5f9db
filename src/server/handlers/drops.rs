use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;

use crate::drop::{
    create_drop, delete_drop, get_drop, list_drops, update_drop, CreateDropOptions,
    DeleteDropResult, Drop, ListDropsOptions,
};
use crate::server::extract::{ApiJson, AuthUser};
use crate::server::structured_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDropsQuery {
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub stream_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDropRequest {
    pub title: String,
    #[serde(default)]
    pub stream_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDropRequest {
    #[serde(default)]
    pub title: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListDropsQuery>,
) -> Result<Json<Vec<Drop>>, ApiError> {
    let drops = list_drops(
        &state.db,
        ListDropsOptions {
            author_id: query.author_id,
            stream_id: query.stream_id,
            limit: query.limit.unwrap_or(0),
            offset: query.offset.unwrap_or(0).max(0),
        },
    )
    .await?;
    Ok(Json(drops))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<CreateDropRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let drop = create_drop(
        &state.db,
        CreateDropOptions {
            author_id: user.id,
            title: req.title,
            stream_id: req.stream_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(drop)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Drop>, ApiError> {
    Ok(Json(get_drop(&state.db, &id).await?))
}

async fn ensure_author(state: &AppState, user: &AuthUser, drop_id: &str) -> Result<(), ApiError> {
    let drop = get_drop(&state.db, drop_id).await?;
    if drop.author_id == user.0.id {
        Ok(())
    } else {
        user.require_staff()
    }
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateDropRequest>,
) -> Result<Json<Drop>, ApiError> {
    ensure_author(&state, &user, &id).await?;
    Ok(Json(update_drop(&state.db, &id, req.title).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteDropResult>, ApiError> {
    ensure_author(&state, &user, &id).await?;
    Ok(Json(delete_drop(&state.db, &id).await?))
}
