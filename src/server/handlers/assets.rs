use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;

use crate::asset::{
    delete_asset, get_asset, list_assets, register_asset, Asset, DeleteAssetResult,
    RegisterAssetOptions,
};
use crate::server::extract::{ApiJson, AuthUser};
use crate::server::structured_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssetsQuery {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAssetRequest {
    pub title: String,
    pub media_type: String,
    pub url: String,
    #[serde(default)]
    pub width: Option<i64>,
    #[serde(default)]
    pub height: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListAssetsQuery>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    let assets = list_assets(
        &state.db,
        query.owner_id.as_deref(),
        query.limit.unwrap_or(50),
        query.offset.unwrap_or(0).max(0),
    )
    .await?;
    Ok(Json(assets))
}

pub async fn register(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<RegisterAssetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = register_asset(
        &state.db,
        RegisterAssetOptions {
            owner_id: user.id,
            title: req.title,
            media_type: req.media_type,
            url: req.url,
            width: req.width,
            height: req.height,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Asset>, ApiError> {
    Ok(Json(get_asset(&state.db, &id).await?))
}

/// Owner or staff. Refused while a post block still references the asset.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteAssetResult>, ApiError> {
    let asset = get_asset(&state.db, &id).await?;
    if asset.owner_id != user.0.id {
        user.require_staff()?;
    }
    Ok(Json(delete_asset(&state.db, &id).await?))
}
