//! Data models for the PostgreSQL MCP Server.

pub mod backup;
pub mod query;
pub mod schema;

pub use backup::{BackupFormat, BackupOptions, BackupResult};
pub use query::{QueryRequest, QueryResult};
pub use schema::{ColumnInfo, ConstraintInfo, MissingTableInfo, SchemaResult, TableInfo};
