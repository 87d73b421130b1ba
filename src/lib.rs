//! Caching Proxy - A forwarding HTTP/1.0 proxy
//!
//! Relays client GET requests to origin servers and keeps small responses in
//! a byte-bounded in-memory LRU cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;

pub use api::AdminState;
pub use cache::SharedCache;
pub use config::{Cli, Config};
pub use proxy::{serve, TcpConnector};
