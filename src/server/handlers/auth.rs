use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{create_session, revoke_session, SessionToken};
use crate::server::extract::{bearer_token, ApiJson, AuthUser};
use crate::server::structured_error::ApiError;
use crate::server::AppState;
use crate::user::{get_user_by_username, register_user, RegisterUserOptions, User, UserError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub session: SessionToken,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = register_user(
        &state.db,
        RegisterUserOptions {
            username: req.username,
            display_name: req.display_name,
        },
    )
    .await?;
    let session = create_session(&state.db, &user.id, state.session_ttl).await?;
    Ok((StatusCode::CREATED, Json(SessionResponse { user, session })))
}

/// Issue a session for an existing username. Credentials are checked by the
/// identity provider in front of this service.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = match get_user_by_username(&state.db, req.username.trim()).await {
        Ok(user) => user,
        Err(UserError::UserNotFound(_)) => {
            return Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unknown username",
            ))
        }
        Err(e) => return Err(e.into()),
    };
    let session = create_session(&state.db, &user.id, state.session_ttl).await?;
    info!(user_id = %user.id, "User logged in");
    Ok(Json(SessionResponse { user, session }))
}

pub async fn logout(
    State(state): State<AppState>,
    _user: AuthUser,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)?;
    revoke_session(&state.db, token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
