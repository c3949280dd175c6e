//! End-to-end tests against a live PostgreSQL server.
//!
//! These run only when PG_MCP_TEST_DATABASE points at a reachable database,
//! e.g. `PG_MCP_TEST_DATABASE=postgres://postgres@localhost/postgres`.
//! Without it every test returns early.

use pg_mcp_server::config::TlsMode;
use pg_mcp_server::db::{PoolConfig, PoolManager, QueryExecutor, SchemaInspector};
use pg_mcp_server::error::PgError;
use pg_mcp_server::models::QueryRequest;
use std::sync::Arc;
use std::time::Duration;

fn test_database_url() -> Option<String> {
    std::env::var("PG_MCP_TEST_DATABASE").ok().filter(|s| !s.is_empty())
}

fn pool_config(url: &str) -> PoolConfig {
    PoolConfig {
        connection_string: url.to_string(),
        max_connections: 5,
        idle_timeout: Duration::from_secs(10),
        connect_timeout: Duration::from_secs(10),
        statement_timeout: Duration::from_secs(30),
        tls: TlsMode::Disable,
    }
}

async fn setup() -> Option<Arc<PoolManager>> {
    let url = test_database_url()?;
    let pool = Arc::new(PoolManager::new());
    pool.initialize(&pool_config(&url))
        .await
        .expect("test database should be reachable");
    Some(pool)
}

#[tokio::test]
async fn test_select_one_normalized_result() {
    let Some(pool) = setup().await else { return };
    let executor = QueryExecutor::new(pool.clone());

    let result = executor
        .execute(&QueryRequest::new("SELECT 1 AS one"))
        .await
        .unwrap();

    assert_eq!(result.command, "SELECT");
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["one"], serde_json::json!(1));

    pool.close().await;
}

#[tokio::test]
async fn test_row_count_matches_rows_len() {
    let Some(pool) = setup().await else { return };
    let executor = QueryExecutor::new(pool.clone());

    let result = executor
        .execute(&QueryRequest::new(
            "SELECT n FROM generate_series(1, 5) AS g(n)",
        ))
        .await
        .unwrap();

    assert_eq!(result.row_count, result.rows.len() as u64);
    assert_eq!(result.row_count, 5);

    pool.close().await;
}

#[tokio::test]
async fn test_failing_statement_surfaces_original_error() {
    let Some(pool) = setup().await else { return };
    let executor = QueryExecutor::new(pool.clone());

    let err = executor
        .execute(&QueryRequest::new(
            "INSERT INTO pg_mcp_definitely_missing VALUES (1)",
        ))
        .await
        .unwrap_err();

    match err {
        PgError::Query { sql_state, .. } => {
            // undefined_table
            assert_eq!(sql_state.as_deref(), Some("42P01"));
        }
        other => panic!("expected query error, got {:?}", other),
    }

    // The lease was released and the session is usable again
    let result = executor
        .execute(&QueryRequest::new("SELECT 1 AS one"))
        .await
        .unwrap();
    assert_eq!(result.row_count, 1);

    pool.close().await;
}

#[tokio::test]
async fn test_transaction_control_not_wrapped() {
    let Some(pool) = setup().await else { return };
    let executor = QueryExecutor::new(pool.clone());

    // Would fail with a nested-transaction error if auto-wrapped
    let begin = executor.execute(&QueryRequest::new("BEGIN")).await.unwrap();
    assert_eq!(begin.command, "BEGIN");

    executor
        .execute(&QueryRequest::new("ROLLBACK"))
        .await
        .unwrap();

    pool.close().await;
}

#[tokio::test]
async fn test_initialize_identical_string_is_noop() {
    let Some(url) = test_database_url() else { return };
    let pool = Arc::new(PoolManager::new());
    let config = pool_config(&url);

    pool.initialize(&config).await.unwrap();
    let before = pool.stats().await;

    pool.initialize(&config).await.unwrap();
    let after = pool.stats().await;

    // Same pool instance: open connections survive the second call
    assert!(pool.is_initialized().await);
    assert!(after.total >= before.total.min(1));

    pool.close().await;
}

#[tokio::test]
async fn test_checkout_retries_before_exhaustion() {
    let Some(url) = test_database_url() else { return };
    let pool = Arc::new(PoolManager::new());
    pool.initialize(&PoolConfig {
        max_connections: 1,
        connect_timeout: Duration::from_secs(1),
        ..pool_config(&url)
    })
    .await
    .unwrap();

    // Hold the only connection so every acquisition attempt times out
    let _lease = pool.checkout().await.unwrap();

    let start = std::time::Instant::now();
    let err = pool.checkout_with_retry(3, 100).await.unwrap_err();
    let elapsed = start.elapsed();

    match err {
        PgError::PoolExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected pool exhaustion, got {:?}", other),
    }
    // 3 acquire timeouts of ~1s plus backoff sleeps of 100ms and 200ms
    assert!(elapsed >= Duration::from_millis(3300));

    drop(_lease);
    pool.close().await;
}

#[tokio::test]
async fn test_get_schema_reports_missing_table() {
    let Some(pool) = setup().await else { return };
    let inspector = SchemaInspector::new(pool.clone());

    let requested = vec!["pg_mcp_definitely_missing".to_string()];
    let result = inspector.get_schema(Some(&requested), false).await.unwrap();

    assert!(result.tables.is_empty());
    let missing = result.missing_tables.expect("missing_tables present");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].name, "pg_mcp_definitely_missing");
    assert!(missing[0].suggestions.len() <= 3);

    pool.close().await;
}

#[tokio::test]
async fn test_statement_timeout_fires_as_query_error() {
    let Some(pool) = setup().await else { return };
    let executor = QueryExecutor::new(pool.clone());

    let err = executor
        .execute(&QueryRequest::new("SELECT pg_sleep(5)").with_timeout_ms(100))
        .await
        .unwrap_err();

    match err {
        PgError::Query { sql_state, .. } => {
            // query_canceled
            assert_eq!(sql_state.as_deref(), Some("57014"));
        }
        other => panic!("expected query error, got {:?}", other),
    }

    pool.close().await;
}
