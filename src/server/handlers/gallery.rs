use axum::extract::State;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::ensure_can_edit;
use crate::gallery::{
    add_gallery_images, list_gallery_images, remove_gallery_image, replace_gallery, GalleryImage,
    ReplaceOutcome,
};
use crate::metrics::OperationTimer;
use crate::server::extract::{ApiJson, AuthUser, ParentPath, RequestId};
use crate::server::structured_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRequest {
    pub asset_ids: Vec<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    path: ParentPath,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    let block_id = path.param("block_id")?;
    Ok(Json(list_gallery_images(&state.db, &path.parent, block_id).await?))
}

/// Append assets to the gallery; assets already present are left in place.
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    path: ParentPath,
    ApiJson(req): ApiJson<GalleryRequest>,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    ensure_can_edit(&state, &user, &path.parent).await?;
    let images = add_gallery_images(
        &state.db,
        &path.parent,
        path.param("block_id")?,
        req.asset_ids,
        Some(state.config.limits.max_gallery_images),
    )
    .await?;
    Ok(Json(images))
}

#[instrument(
    name = "http.replace_gallery",
    skip(state, request_id, user, path, req),
    fields(request_id = %request_id.0, parent = %path.parent)
)]
pub async fn replace(
    State(state): State<AppState>,
    request_id: RequestId,
    user: AuthUser,
    path: ParentPath,
    ApiJson(req): ApiJson<GalleryRequest>,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    let _timer = OperationTimer::new("replace_gallery").with_request_id(request_id.0.clone());
    ensure_can_edit(&state, &user, &path.parent).await?;
    let outcome = replace_gallery(
        &state.db,
        &path.parent,
        path.param("block_id")?,
        req.asset_ids,
        Some(state.config.limits.max_gallery_images),
    )
    .await?;
    match outcome {
        ReplaceOutcome::Replaced(images) => Ok(Json(images)),
        ReplaceOutcome::FailedRestored { reason } => Err(replace_failed(reason, true)),
        ReplaceOutcome::FailedUnrestored { reason } => Err(replace_failed(reason, false)),
    }
}

fn replace_failed(reason: String, restored: bool) -> ApiError {
    let tip = if restored {
        "The previous images are unchanged; retry the request"
    } else {
        "The gallery may be incomplete; check the block and re-send the full list"
    };
    ApiError::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "GALLERY_REPLACE_FAILED",
        format!("Replacing gallery images failed: {reason}"),
    )
    .with_tip(tip)
    .with_detail("restored", Value::Bool(restored))
}

pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    path: ParentPath,
) -> Result<Json<GalleryImage>, ApiError> {
    ensure_can_edit(&state, &user, &path.parent).await?;
    let image = remove_gallery_image(
        &state.db,
        &path.parent,
        path.param("block_id")?,
        path.param("image_id")?,
    )
    .await?;
    Ok(Json(image))
}
