//! Outbound request construction.
//!
//! The origin always sees an HTTP/1.0 `GET` with `Connection: close`,
//! whatever the client asked for.

use tokio::io::AsyncBufRead;

use crate::error::{ProxyError, Result};
use crate::proxy::line::{is_blank_line, read_line, MAX_HEADER_BYTES, MAX_LINE};
use crate::proxy::uri::Target;

pub const USER_AGENT_HEADER: &str =
    "User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3\r\n";
pub const CONNECTION_HEADER: &str = "Connection: close\r\n";
pub const PROXY_CONNECTION_HEADER: &str = "Proxy-Connection: close\r\n";

/// Headers the proxy always sets itself.
const PROXY_CONTROLLED: [&str; 3] = ["User-Agent", "Connection", "Proxy-Connection"];

/// Reads client header lines up to the blank line (or EOF).
///
/// Lines are returned raw, terminators included; the blank line is consumed
/// but not returned. A line cut short by EOF or `MAX_LINE` gets a `\r\n`
/// appended. Blocks larger than `MAX_HEADER_BYTES` are rejected with
/// [`ProxyError::HeadersTooLarge`].
pub async fn read_header_block<R>(reader: &mut R) -> Result<Vec<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut line = Vec::with_capacity(256);
    let mut total = 0;

    loop {
        let n = read_line(reader, &mut line, MAX_LINE).await?;
        if n == 0 || is_blank_line(&line) {
            break;
        }

        total += n;
        if total > MAX_HEADER_BYTES {
            return Err(ProxyError::HeadersTooLarge {
                limit: MAX_HEADER_BYTES,
            });
        }

        let mut header = line.clone();
        if !header.ends_with(b"\n") {
            header.extend_from_slice(b"\r\n");
        }
        lines.push(header);
    }

    Ok(lines)
}

/// Builds the request block sent to the origin.
///
/// Order: request line, `Host`, the three proxy-controlled headers, then
/// the remaining client headers verbatim in their original order, then the
/// terminating blank line.
pub fn rewrite_request(target: &Target, client_headers: &[Vec<u8>]) -> Vec<u8> {
    let mut host = None;
    let mut others: Vec<&[u8]> = Vec::new();

    for line in client_headers {
        if is_header(line, "Host") {
            host = Some(line.as_slice());
        } else if !PROXY_CONTROLLED.iter().any(|name| is_header(line, name)) {
            others.push(line);
        }
    }

    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(format!("GET {} HTTP/1.0\r\n", target.path).as_bytes());
    match host {
        Some(line) => out.extend_from_slice(line),
        None => out.extend_from_slice(format!("Host: {}\r\n", target.host).as_bytes()),
    }
    out.extend_from_slice(USER_AGENT_HEADER.as_bytes());
    out.extend_from_slice(CONNECTION_HEADER.as_bytes());
    out.extend_from_slice(PROXY_CONNECTION_HEADER.as_bytes());
    for line in others {
        out.extend_from_slice(line);
    }
    out.extend_from_slice(b"\r\n");
    out
}

/// Case-insensitive `Name:` prefix match.
fn is_header(line: &[u8], name: &str) -> bool {
    let name = name.as_bytes();
    line.len() > name.len()
        && line[..name.len()].eq_ignore_ascii_case(name)
        && line[name.len()] == b':'
}
