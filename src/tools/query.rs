//! Query execution tools.
//!
//! Implements the `query` and `execute_file` MCP tools. Both run exactly one
//! logical statement through the transactional envelope of
//! [`QueryExecutor`].

use crate::db::{PoolManager, QueryExecutor};
use crate::error::PgResult;
use crate::models::{QueryRequest, QueryResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

fn default_transactional() -> bool {
    true
}

/// Input for the query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to execute (one logical statement per call)
    pub sql: String,
    /// Wrap the statement in a transaction with rollback-on-error. Default: true
    #[serde(default = "default_transactional")]
    pub transactional: bool,
    /// Statement timeout in milliseconds, enforced server-side
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Input for the execute_file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteFileInput {
    /// Path to a SQL file; relative paths resolve against the server working directory
    pub path: String,
    /// Wrap the contents in a transaction with rollback-on-error. Default: true
    #[serde(default = "default_transactional")]
    pub transactional: bool,
    /// Statement timeout in milliseconds, enforced server-side
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Output from the query tools.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryOutput {
    /// Leading SQL verb, upper-cased (SELECT, INSERT, CREATE, ...)
    pub command: String,
    /// Number of returned rows, or the affected-row count for statements without output
    pub row_count: u64,
    /// Result rows as key-value maps
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    /// Wall-clock execution time in milliseconds
    pub duration_ms: u64,
}

impl From<QueryResult> for QueryOutput {
    fn from(result: QueryResult) -> Self {
        Self {
            command: result.command,
            row_count: result.row_count,
            rows: result.rows,
            duration_ms: result.duration_ms,
        }
    }
}

/// Handler for the query tools.
pub struct QueryToolHandler {
    executor: QueryExecutor,
}

impl QueryToolHandler {
    /// Create a new query tool handler.
    pub fn new(pool: Arc<PoolManager>) -> Self {
        Self {
            executor: QueryExecutor::new(pool),
        }
    }

    /// Execute a SQL statement.
    pub async fn query(&self, input: QueryInput) -> PgResult<QueryOutput> {
        let request = QueryRequest {
            sql: input.sql,
            transactional: input.transactional,
            timeout_ms: input.timeout_ms,
        };
        self.executor.execute(&request).await.map(Into::into)
    }

    /// Execute the contents of a SQL file.
    pub async fn execute_file(&self, input: ExecuteFileInput) -> PgResult<QueryOutput> {
        self.executor
            .execute_file(&input.path, input.transactional, input.timeout_ms)
            .await
            .map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_input_defaults() {
        let input: QueryInput = serde_json::from_str(r#"{"sql": "SELECT 1"}"#).unwrap();
        assert!(input.transactional);
        assert!(input.timeout_ms.is_none());
    }

    #[test]
    fn test_query_input_explicit_fields() {
        let input: QueryInput = serde_json::from_str(
            r#"{"sql": "DELETE FROM t", "transactional": false, "timeout_ms": 2500}"#,
        )
        .unwrap();
        assert!(!input.transactional);
        assert_eq!(input.timeout_ms, Some(2500));
    }

    #[test]
    fn test_output_from_result() {
        let result = QueryResult {
            command: "SELECT".to_string(),
            row_count: 2,
            rows: Vec::new(),
            duration_ms: 7,
        };
        let output = QueryOutput::from(result);
        assert_eq!(output.command, "SELECT");
        assert_eq!(output.row_count, 2);
    }
}
