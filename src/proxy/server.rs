//! Accept loop and per-connection handler.
//!
//! Every accepted connection runs in its own detached task. Tasks share
//! nothing but the cache handle and the connector.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{self, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::cache::SharedCache;
use crate::proxy::connector::OriginConnector;
use crate::proxy::relay::{relay, RelayOutcome};

/// Binds the client-facing listener on all interfaces.
pub async fn bind(port: u16) -> io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}

/// Accepts connections until `shutdown` resolves.
///
/// Connection tasks are never joined; in-flight ones keep running after
/// this returns.
pub async fn serve<C, F>(
    listener: TcpListener,
    cache: SharedCache,
    connector: Arc<C>,
    shutdown: F,
) -> io::Result<()>
where
    C: OriginConnector + 'static,
    F: Future<Output = ()>,
{
    info!(address = %listener.local_addr()?, "Proxy listening");
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Stopping accept loop");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!(%peer, "Accepted connection");
                    let cache = cache.clone();
                    let connector = Arc::clone(&connector);
                    tokio::spawn(
                        handle_connection(stream, cache, connector)
                            .instrument(info_span!("connection", %peer)),
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

/// Runs the relay for one client and closes the socket afterwards.
///
/// Failures are logged only; the client sees the connection close.
pub async fn handle_connection<C>(stream: TcpStream, cache: SharedCache, connector: Arc<C>)
where
    C: OriginConnector,
{
    if let Err(e) = stream.set_nodelay(true) {
        debug!(error = %e, "Could not set TCP_NODELAY");
    }

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    match relay(&mut reader, &mut write_half, &cache, connector.as_ref()).await {
        Ok(RelayOutcome::Closed) => debug!("Client closed without a request"),
        Ok(RelayOutcome::CacheHit { bytes }) => info!(bytes, "Served from cache"),
        Ok(RelayOutcome::Forwarded { bytes, cached }) => {
            info!(bytes, cached, "Relayed origin response")
        }
        Err(e) => warn!(error = %e, "Dropping connection"),
    }

    if let Err(e) = write_half.shutdown().await {
        debug!(error = %e, "Client socket already closed");
    }
}
