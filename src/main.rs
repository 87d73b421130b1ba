//! Caching Proxy - A forwarding HTTP/1.0 proxy
//!
//! Relays client GET requests to origin servers and keeps small responses in
//! a byte-bounded in-memory LRU cache.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caching_proxy::api::serve_admin;
use caching_proxy::proxy::bind;
use caching_proxy::{serve, AdminState, Cli, Config, SharedCache, TcpConnector};

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Parse command line (listening port, optional admin port)
/// 2. Initialize tracing subscriber for logging
/// 3. Load configuration from environment and CLI
/// 4. Create the shared object cache
/// 5. Start the admin API if an admin port is configured
/// 6. Run the accept loop until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caching_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting caching proxy");

    let config = Config::from_cli(&cli);
    info!(
        "Configuration loaded: port={}, max_cache_size={}, max_object_size={}, admin_port={:?}",
        config.port, config.max_cache_size, config.max_object_size, config.admin_port
    );

    let cache = SharedCache::from_config(&config);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let admin_handle = match config.admin_port {
        Some(port) => {
            let listener = bind(port)
                .await
                .with_context(|| format!("Failed to bind admin port {}", port))?;
            let state = AdminState::new(cache.clone());
            let shutdown = wait_for_shutdown(shutdown_rx.clone());
            Some(tokio::spawn(async move {
                if let Err(e) = serve_admin(listener, state, shutdown).await {
                    warn!(error = %e, "Admin API stopped");
                }
            }))
        }
        None => None,
    };

    let listener = bind(config.port)
        .await
        .with_context(|| format!("Failed to bind proxy port {}", config.port))?;

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    serve(
        listener,
        cache,
        Arc::new(TcpConnector),
        wait_for_shutdown(shutdown_rx),
    )
    .await
    .context("Proxy accept loop failed")?;

    if let Some(handle) = admin_handle {
        let _ = handle.await;
    }

    info!("Proxy shutdown complete");
    Ok(())
}

/// Resolves once the shutdown flag flips (or the sender is gone).
async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
