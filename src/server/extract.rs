//! Request extractors shared by the handlers.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::Json;
use http::request::Parts;
use http::{header, HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use super::structured_error::ApiError;
use super::AppState;
use crate::auth::{resolve_session, AuthError};
use crate::block::BlockParent;
use crate::http_logging::REQUEST_ID_HEADER;
use crate::user::User;

/// Bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// The user behind the request's session token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(&parts.headers)?;
        let user = resolve_session(&state.db, token).await?;
        Ok(AuthUser(user))
    }
}

impl AuthUser {
    /// Admin or owner.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.0.role.is_staff() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Admin or owner role required"))
        }
    }
}

/// Request id set by the HTTP logging layer.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        Ok(RequestId(id))
    }
}

/// JSON body whose rejections use the structured error format with 400.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// Block parent taken from a `/drops/{id}/...` or `/streams/{id}/...` path,
/// plus the remaining path parameters.
#[derive(Debug, Clone)]
pub struct ParentPath {
    pub parent: BlockParent,
    params: HashMap<String, String>,
}

impl ParentPath {
    pub fn param(&self, name: &str) -> Result<&str, ApiError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ApiError::validation(format!("missing path parameter '{name}'")))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ParentPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        let id = params
            .get("id")
            .cloned()
            .ok_or_else(|| ApiError::validation("missing parent id"))?;
        let path = parts.uri.path();
        let parent = if path.starts_with("/drops/") {
            BlockParent::Drop(id)
        } else if path.starts_with("/streams/") {
            BlockParent::Stream(id)
        } else {
            return Err(ApiError::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("no block parent in '{path}'"),
            ));
        };
        Ok(ParentPath { parent, params })
    }
}
