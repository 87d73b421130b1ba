//! Admin API Routes
//!
//! Configures the Axum router for the diagnostics endpoints.

use std::future::Future;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{
    cache_dump_handler, cache_entry_handler, health_handler, stats_handler, AdminState,
};

/// Creates the admin router.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /stats` - Cache counters and limits
/// - `GET /cache` - Cached URIs and sizes, most recently used first
/// - `GET /cache/entry?uri=...` - Metadata for one canonical URI
pub fn create_router(state: AdminState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", get(cache_dump_handler))
        .route("/cache/entry", get(cache_entry_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the admin API until `shutdown` resolves.
pub async fn serve_admin<F>(listener: TcpListener, state: AdminState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(address = %listener.local_addr()?, "Admin API listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
