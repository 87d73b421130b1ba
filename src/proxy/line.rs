//! Bounded line reads over buffered async streams.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};

/// Longest line handed back by a single [`read_line`] call.
pub const MAX_LINE: usize = 8192;

/// Upper bound on the total size of a client header block.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Reads one line into `buf`, replacing its contents.
///
/// Stops after a `\n` (kept in `buf`), after `max` bytes, or at EOF,
/// whichever comes first. Returns the number of bytes read; 0 means EOF.
pub async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, max: usize) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();

    while buf.len() < max {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            break;
        }

        let room = max - buf.len();
        let window = &available[..available.len().min(room)];
        match window.iter().position(|&b| b == b'\n') {
            Some(end) => {
                buf.extend_from_slice(&window[..=end]);
                reader.consume(end + 1);
                break;
            }
            None => {
                let taken = window.len();
                buf.extend_from_slice(window);
                reader.consume(taken);
            }
        }
    }

    Ok(buf.len())
}

/// True for the empty line that ends a header block.
pub fn is_blank_line(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}
