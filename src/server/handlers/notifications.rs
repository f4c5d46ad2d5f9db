use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::notification::{
    list_notifications, mark_all_read, mark_read, ListNotificationsOptions, Notification,
};
use crate::server::extract::AuthUser;
use crate::server::structured_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread: bool,
    #[serde(default)]
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = list_notifications(
        &state.db,
        &user.id,
        ListNotificationsOptions {
            unread_only: query.unread,
            limit: query.limit.unwrap_or(0),
        },
    )
    .await?;
    Ok(Json(notifications))
}

pub async fn read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(mark_read(&state.db, &user.id, &id).await?))
}

pub async fn read_all(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let updated = mark_all_read(&state.db, &user.id).await?;
    Ok(Json(json!({ "updated": updated })))
}
