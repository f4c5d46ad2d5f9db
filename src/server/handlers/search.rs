use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::metrics::OperationTimer;
use crate::search::{search, SearchResult};
use crate::server::extract::AuthUser;
use crate::server::structured_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// `GET /search?q=...`; `limit` is capped by `limits.max_search_results`.
pub async fn run(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let _timer = OperationTimer::new("search");
    let cap = state.config.limits.max_search_results;
    let limit = params.limit.map_or(cap, |l| l.clamp(1, cap));
    Ok(Json(search(&state.db, &params.q, limit).await?))
}
