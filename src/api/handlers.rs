//! Admin API Handlers
//!
//! Read-only diagnostics over the shared cache. Nothing here promotes
//! entries or changes statistics.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::{EntryInfo, SharedCache};
use crate::error::ApiError;
use crate::models::{CacheDumpResponse, EntryQuery, HealthResponse, StatsResponse};

/// Application state shared across all admin handlers.
#[derive(Clone)]
pub struct AdminState {
    /// Same handle the proxy connections use
    pub cache: SharedCache,
}

impl AdminState {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AdminState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;

    Json(StatsResponse::new(
        &stats,
        state.cache.max_cache_size(),
        state.cache.max_object_size(),
    ))
}

/// Handler for GET /cache
///
/// Lists cached URIs and sizes, most recently used first.
pub async fn cache_dump_handler(State(state): State<AdminState>) -> Json<CacheDumpResponse> {
    Json(CacheDumpResponse::new(state.cache.snapshot().await))
}

/// Handler for GET /cache/entry?uri=...
pub async fn cache_entry_handler(
    State(state): State<AdminState>,
    Query(query): Query<EntryQuery>,
) -> Result<Json<EntryInfo>, ApiError> {
    let uri = query.validate().map_err(ApiError::InvalidRequest)?;

    state
        .cache
        .peek(uri)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(uri.to_string()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
