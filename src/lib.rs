//! PostgreSQL MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for safe, ad-hoc
//! access to a PostgreSQL database: transactional query execution, schema
//! introspection with name suggestions, and pg_dump backups.

pub mod backup;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::PgError;
pub use mcp::PgService;
