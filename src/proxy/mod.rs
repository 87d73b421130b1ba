//! Proxy Module
//!
//! Request parsing, header rewriting and the relay between client and origin.
//!
//! # Flow
//! accept -> read request line -> parse target -> cache lookup
//! -> (miss) connect origin -> send rewritten request -> stream response
//! -> cache insert when the response fits

pub mod connector;
pub mod headers;
pub mod line;
pub mod relay;
pub mod server;
pub mod uri;

pub use connector::{OriginConnector, TcpConnector};
pub use relay::{relay, RelayOutcome, ResponseAccumulator};
pub use server::{bind, handle_connection, serve};
pub use uri::Target;
