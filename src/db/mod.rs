//! Database access layer: pool lifecycle, query execution, introspection.

pub mod executor;
pub mod pool;
pub mod schema;
pub mod types;

pub use executor::QueryExecutor;
pub use pool::{PoolConfig, PoolManager, PoolStats};
pub use schema::SchemaInspector;
