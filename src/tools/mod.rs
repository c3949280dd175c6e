//! MCP tool implementations.
//!
//! Each tool module defines its input/output types (with JSON schemas for
//! the MCP tool registry) and a handler struct over the shared state.

pub mod backup;
pub mod query;
pub mod schema;

pub use backup::BackupToolHandler;
pub use query::QueryToolHandler;
pub use schema::SchemaToolHandler;
