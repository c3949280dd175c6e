//! Query execution engine.
//!
//! One logical statement per call, wrapped in a transactional envelope:
//! lease a connection, apply the optional session statement timeout, open a
//! transaction (unless the statement is itself transaction control), execute,
//! commit on success, best-effort rollback on failure. The original error is
//! always what the caller sees; rollback failures are logged. The lease is
//! returned to the pool on every path by the connection guard's `Drop`.

use crate::db::pool::PoolManager;
use crate::db::types::RowToJson;
use crate::error::{PgError, PgResult};
use crate::models::{QueryRequest, QueryResult};
use futures_util::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Acquire, Either, Postgres};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Executes single statements against the shared pool.
pub struct QueryExecutor {
    pool: Arc<PoolManager>,
}

impl QueryExecutor {
    /// Create an executor over the shared pool.
    pub fn new(pool: Arc<PoolManager>) -> Self {
        Self { pool }
    }

    /// Execute one SQL statement and return a normalized result.
    pub async fn execute(&self, request: &QueryRequest) -> PgResult<QueryResult> {
        let start = Instant::now();
        let sql = request.sql.trim();
        if sql.is_empty() {
            return Err(PgError::validation("SQL statement is empty"));
        }

        debug!(
            transactional = request.transactional,
            timeout_ms = ?request.timeout_ms,
            "Executing statement"
        );

        let mut conn = self.pool.checkout().await?;

        // Session-scoped timeout, applied before the envelope opens. A failure
        // here propagates immediately; the lease is released by Drop.
        if let Some(ms) = request.timeout_ms {
            let directive = format!("SET statement_timeout = {}", ms);
            sqlx::query(&directive).execute(&mut *conn).await?;
        }

        let wrap = request.transactional && !is_transaction_control(sql);
        let (rows, rows_affected) = if wrap {
            let mut tx = conn.begin().await?;
            match run_statement(&mut *tx, sql).await {
                Ok(out) => {
                    tx.commit().await?;
                    out
                }
                Err(e) => {
                    // The original error is authoritative; a failed rollback
                    // must not mask it.
                    if let Err(rb) = tx.rollback().await {
                        warn!(error = %rb, "Rollback failed after query error");
                    }
                    return Err(e);
                }
            }
        } else {
            run_statement(&mut *conn, sql).await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let row_count = if rows.is_empty() {
            rows_affected
        } else {
            rows.len() as u64
        };

        Ok(QueryResult {
            command: command_verb(sql),
            row_count,
            rows: rows.iter().map(RowToJson::to_json_map).collect(),
            duration_ms,
        })
    }

    /// Execute the contents of a SQL file through the same path as [`execute`].
    ///
    /// Relative paths resolve against the process working directory; a path
    /// that does not resolve to a file fails fast before any I/O on the pool.
    ///
    /// [`execute`]: QueryExecutor::execute
    pub async fn execute_file(
        &self,
        path: impl AsRef<Path>,
        transactional: bool,
        timeout_ms: Option<u64>,
    ) -> PgResult<QueryResult> {
        let path = path.as_ref();
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| PgError::internal(format!("Cannot resolve working directory: {}", e)))?
                .join(path)
        };

        if !resolved.is_file() {
            return Err(PgError::file_not_found(resolved.display().to_string()));
        }

        let sql = tokio::fs::read_to_string(&resolved).await.map_err(|e| {
            PgError::internal(format!("Failed to read {}: {}", resolved.display(), e))
        })?;

        debug!(path = %resolved.display(), bytes = sql.len(), "Executing SQL file");

        let request = QueryRequest {
            sql,
            transactional,
            timeout_ms,
        };
        self.execute(&request).await
    }
}

/// Run one statement, collecting returned rows and the affected-row count.
async fn run_statement<'a, E>(executor: E, sql: &str) -> PgResult<(Vec<PgRow>, u64)>
where
    E: sqlx::Executor<'a, Database = Postgres>,
{
    let mut stream = executor.fetch_many(sqlx::query(sql));
    let mut rows = Vec::new();
    let mut rows_affected = 0u64;

    while let Some(item) = stream.try_next().await.map_err(PgError::from)? {
        match item {
            Either::Left(done) => rows_affected += done.rows_affected(),
            Either::Right(row) => rows.push(row),
        }
    }

    Ok((rows, rows_affected))
}

/// Detect transaction-control verbs that must not be auto-wrapped.
pub fn is_transaction_control(sql: &str) -> bool {
    let mut words = sql
        .split_whitespace()
        .map(|w| w.trim_matches(';').to_uppercase());

    match words.next().as_deref() {
        Some("BEGIN") | Some("COMMIT") | Some("ROLLBACK") => true,
        Some("START") => words.next().as_deref() == Some("TRANSACTION"),
        _ => false,
    }
}

/// Extract the leading SQL verb, upper-cased.
pub fn command_verb(sql: &str) -> String {
    let verb: String = sql
        .chars()
        .skip_while(|c| !c.is_ascii_alphabetic())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if verb.is_empty() {
        "UNKNOWN".to_string()
    } else {
        verb.to_uppercase()
    }
}
