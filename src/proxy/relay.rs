//! Per-connection relay pipeline.
//!
//! Reads one request from the client, answers it from the cache or from the
//! origin, and caches complete responses that fit the single-object limit.

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::cache::SharedCache;
use crate::error::{ProxyError, Result};
use crate::proxy::connector::OriginConnector;
use crate::proxy::headers::{read_header_block, rewrite_request};
use crate::proxy::line::{read_line, MAX_LINE};
use crate::proxy::uri::Target;

/// How a relayed connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Client sent nothing (or only a blank line)
    Closed,
    /// Answered from the cache without contacting the origin
    CacheHit { bytes: usize },
    /// Streamed from the origin
    Forwarded { bytes: usize, cached: bool },
}

/// Growable response buffer that gives up once the running total passes
/// `limit`. Counting continues after that so the caller can still report
/// the full response size.
#[derive(Debug)]
pub struct ResponseAccumulator {
    buf: Option<Vec<u8>>,
    total: usize,
    limit: usize,
}

impl ResponseAccumulator {
    pub fn new(limit: usize) -> Self {
        Self {
            buf: Some(Vec::new()),
            total: 0,
            limit,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.total += chunk.len();
        if self.total > self.limit {
            self.buf = None;
        } else if let Some(buf) = self.buf.as_mut() {
            buf.extend_from_slice(chunk);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    #[allow(dead_code)]
    pub fn is_abandoned(&self) -> bool {
        self.buf.is_none()
    }

    /// The accumulated bytes, unless the limit was exceeded.
    pub fn into_cacheable(self) -> Option<Vec<u8>> {
        self.buf
    }
}

/// Runs the pipeline for one client connection.
///
/// Nothing is ever written to the client on failure; the caller drops the
/// connection.
pub async fn relay<R, W, C>(
    client_reader: &mut R,
    client_writer: &mut W,
    cache: &SharedCache,
    connector: &C,
) -> Result<RelayOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: OriginConnector,
{
    let mut line = Vec::with_capacity(MAX_LINE);
    if read_line(client_reader, &mut line, MAX_LINE).await? == 0 {
        return Ok(RelayOutcome::Closed);
    }

    let request_line = String::from_utf8_lossy(&line);
    let request_line = request_line.trim_end();
    if request_line.trim().is_empty() {
        return Ok(RelayOutcome::Closed);
    }
    debug!(request_line, "Received request");

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(uri)) = (parts.next(), parts.next()) else {
        return Err(ProxyError::MalformedRequestLine(request_line.to_string()));
    };

    if !method.eq_ignore_ascii_case("GET") {
        return Err(ProxyError::UnsupportedMethod(method.to_string()));
    }

    let target = Target::parse(uri)?;
    let canonical = target.canonical_uri();

    if let Some(payload) = cache.lookup(&canonical).await {
        client_writer.write_all(&payload).await?;
        client_writer.flush().await?;
        return Ok(RelayOutcome::CacheHit {
            bytes: payload.len(),
        });
    }

    let mut origin = connector
        .connect(&target.host, target.port)
        .await
        .map_err(|source| ProxyError::OriginConnect {
            host: target.host.clone(),
            port: target.port,
            source,
        })?;

    let client_headers = read_header_block(client_reader).await?;
    let request = rewrite_request(&target, &client_headers);
    origin.write_all(&request).await?;
    origin.flush().await?;
    debug!(uri = %canonical, request_bytes = request.len(), "Forwarded request to origin");

    let mut origin = BufReader::new(origin);
    let mut chunk = Vec::with_capacity(MAX_LINE);
    let mut accumulator = ResponseAccumulator::new(cache.max_object_size());
    loop {
        let n = read_line(&mut origin, &mut chunk, MAX_LINE).await?;
        if n == 0 {
            break;
        }
        client_writer.write_all(&chunk).await?;
        accumulator.push(&chunk);
    }
    client_writer.flush().await?;

    let bytes = accumulator.total();
    let cached = match accumulator.into_cacheable() {
        Some(body) if !body.is_empty() => match cache.insert(&canonical, &body).await {
            Ok(report) => {
                debug!(
                    uri = %canonical,
                    bytes,
                    evicted = report.evicted.len(),
                    replaced = report.replaced,
                    "Cached response"
                );
                true
            }
            Err(e) => {
                debug!(uri = %canonical, error = %e, "Response not cached");
                false
            }
        },
        // An empty origin response is never cached.
        Some(_) => false,
        None => {
            debug!(uri = %canonical, bytes, "Response exceeds object limit, not cached");
            false
        }
    };

    Ok(RelayOutcome::Forwarded { bytes, cached })
}
