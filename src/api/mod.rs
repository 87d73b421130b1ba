//! Admin API Module
//!
//! Read-only HTTP diagnostics for the proxy cache, served on a separate port.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache statistics
//! - `GET /cache` - Cache dump in recency order
//! - `GET /cache/entry?uri=...` - Single entry metadata

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, serve_admin};
