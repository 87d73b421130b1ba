//! Origin connection seam.

use std::future::Future;

use tokio::io::{self, AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Opens byte streams to origin servers.
pub trait OriginConnector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn connect(&self, host: &str, port: u16)
        -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Resolves the hostname and connects over TCP.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl OriginConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
