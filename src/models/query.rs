//! Query-related data models.
//!
//! This module defines types for SQL query requests and normalized results.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single SQL statement to execute, with its transactional envelope settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Raw SQL text (one logical statement)
    pub sql: String,
    /// Wrap the statement in a transaction with rollback-on-error. Default: true
    #[serde(default = "default_transactional")]
    pub transactional: bool,
    /// Session statement timeout in milliseconds, applied before the statement
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_transactional() -> bool {
    true
}

impl QueryRequest {
    /// Create a new transactional query request.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            transactional: true,
            timeout_ms: None,
        }
    }

    /// Disable the transactional envelope.
    pub fn without_transaction(mut self) -> Self {
        self.transactional = false;
        self
    }

    /// Set the statement timeout in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Normalized result of a single executed statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Leading SQL verb, upper-cased (SELECT, INSERT, CREATE, ...)
    pub command: String,
    /// rows.len() when rows are present, otherwise the server-reported affected count
    pub row_count: u64,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl QueryResult {
    /// Check if the result carries neither rows nor affected rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.row_count == 0
    }
}
