//! JSON-over-HTTP surface.
//!
//! Handlers stay thin: they extract, check permissions and call into the
//! domain modules. Domain errors become structured responses through
//! [`error_mapping::ToStructuredError`].

pub mod error_mapping;
pub mod extract;
mod handlers;
pub mod structured_error;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::{ConfigError, ServerConfig};
use crate::db::Database;
use crate::http_logging::HttpLoggingLayer;
use handlers::{admin, assets, auth, blocks, drops, gallery, notifications, search, streams};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session_ttl = config.session_ttl()?;
        Ok(Self {
            db,
            config: Arc::new(config),
            session_ttl,
        })
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// Block and gallery routes for one parent kind (`/drops` or `/streams`).
fn block_routes(router: Router<AppState>, prefix: &str) -> Router<AppState> {
    router
        .route(
            &format!("{prefix}/{{id}}/blocks"),
            get(blocks::list).post(blocks::insert).put(blocks::reorder),
        )
        .route(
            &format!("{prefix}/{{id}}/blocks/{{block_id}}"),
            patch(blocks::update).delete(blocks::delete),
        )
        .route(
            &format!("{prefix}/{{id}}/blocks/{{block_id}}/gallery"),
            get(gallery::list).post(gallery::add).put(gallery::replace),
        )
        .route(
            &format!("{prefix}/{{id}}/blocks/{{block_id}}/gallery/{{image_id}}"),
            axum::routing::delete(gallery::remove),
        )
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/assets", get(assets::list).post(assets::register))
        .route("/assets/{id}", get(assets::get).delete(assets::delete))
        .route("/drops", get(drops::list).post(drops::create))
        .route(
            "/drops/{id}",
            get(drops::get).patch(drops::update).delete(drops::delete),
        )
        .route("/streams", get(streams::list).post(streams::create))
        .route("/streams/{id}", get(streams::get).delete(streams::delete))
        .route(
            "/streams/{id}/members",
            get(streams::members)
                .post(streams::follow)
                .delete(streams::unfollow),
        )
        .route(
            "/streams/{id}/assets",
            get(streams::assets).post(streams::tag_asset),
        )
        .route(
            "/streams/{id}/assets/{asset_id}",
            axum::routing::delete(streams::untag_asset),
        )
        .route(
            "/streams/{id}/bookmarks",
            get(streams::bookmarks).post(streams::add_bookmark),
        )
        .route(
            "/streams/{id}/bookmarks/{bookmark_id}",
            patch(streams::edit_bookmark).delete(streams::remove_bookmark),
        )
        .route("/notifications", get(notifications::list))
        .route("/notifications/read-all", post(notifications::read_all))
        .route("/notifications/{id}/read", post(notifications::read))
        .route("/search", get(search::run))
        .route("/admin/users", get(admin::users))
        .route("/admin/users/{id}", patch(admin::set_role))
        .route("/admin/streams/merge", post(admin::merge))
        .route("/admin/streams/{id}", patch(admin::rename))
        .route("/admin/drops/{id}", axum::routing::delete(admin::remove_drop));

    let router = block_routes(router, "/drops");
    let router = block_routes(router, "/streams");

    router.with_state(state).layer(HttpLoggingLayer)
}
