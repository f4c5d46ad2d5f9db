//! Common test utilities

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use serde_json::Value;
use streams_server::{build_router, AppState, Database, ServerConfig};
use tower::ServiceExt;

/// Router over a fresh in-memory database with default config
pub fn test_app() -> Router {
    test_app_with_db().0
}

/// Like [`test_app`], but also hands back the database so a test can
/// tamper with it (for example by installing a failing trigger).
pub fn test_app_with_db() -> (Router, Database) {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let state =
        AppState::new(db.clone(), ServerConfig::default()).expect("default config is valid");
    (build_router(state), db)
}

/// Send one request and return the status and the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, value)
}

/// Register `username` and return `(user_id, token)`.
/// The first registration on an app becomes the platform owner.
pub async fn register(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({ "username": username })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let id = body["user"]["id"].as_str().expect("user id").to_string();
    let token = body["session"]["token"].as_str().expect("token").to_string();
    (id, token)
}

/// Register an image asset owned by the token's user and return its id.
#[allow(dead_code)] // Not every test binary uses assets
pub async fn create_asset(app: &Router, token: &str, title: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/assets",
        Some(token),
        Some(serde_json::json!({
            "title": title,
            "mediaType": "image/png",
            "url": format!("https://cdn.example.com/{title}.png"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "asset failed: {body}");
    body["id"].as_str().expect("asset id").to_string()
}

/// Create a stream and return its id.
#[allow(dead_code)] // Not every test binary uses streams
pub async fn create_stream(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/streams",
        Some(token),
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "stream failed: {body}");
    body["id"].as_str().expect("stream id").to_string()
}
