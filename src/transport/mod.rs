//! Transport layer for the MCP server.
//!
//! The server speaks the MCP protocol over standard input/output, the
//! standard mode for CLI-driven tool clients.

pub mod stdio;

pub use stdio::StdioTransport;

use crate::error::PgResult;
use std::future::Future;

/// Trait for MCP transport implementations.
pub trait Transport: Send + Sync {
    /// Start the transport and block until it shuts down.
    fn run(&self) -> impl Future<Output = PgResult<()>> + Send;

    /// Get the name of this transport for logging.
    fn name(&self) -> &'static str;
}
