//! Request-target decomposition and canonical cache keys.

use std::fmt;

use crate::error::{ProxyError, Result};

/// Port used when the request target names none.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Origin and path named by a request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    /// Always starts with `/`
    pub path: String,
}

impl Target {
    /// Splits a request target into host, port and path.
    ///
    /// Accepts `scheme://host[:port][/path]` as well as scheme-less
    /// `host[:port][/path]` and bare `/path` (which yields an empty host).
    /// The hostname is not validated. A port that is not a valid `u16` is
    /// rejected; an empty port falls back to 80.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = strip_scheme(uri);

        let (authority, path) = match rest.find('/') {
            Some(slash) => (&rest[..slash], &rest[slash..]),
            None => (rest, "/"),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, "")) => (host, DEFAULT_HTTP_PORT),
            Some((host, port)) => (
                host,
                port.parse::<u16>()
                    .map_err(|_| ProxyError::InvalidPort(port.to_string()))?,
            ),
            None => (authority, DEFAULT_HTTP_PORT),
        };

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Cache key: `http://host:port/path`, port always spelled out.
    pub fn canonical_uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}{}", self.host, self.port, self.path)
    }
}

// A `://` only counts as a scheme separator when it precedes the path.
fn strip_scheme(uri: &str) -> &str {
    match uri.find("://") {
        Some(sep) if !uri[..sep].contains('/') => &uri[sep + 3..],
        _ => uri,
    }
}
