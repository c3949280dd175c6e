//! Stdio transport for the MCP server.
//!
//! Reads JSON-RPC messages from stdin and writes responses to stdout,
//! following the MCP protocol specification.

use crate::backup::BackupRunner;
use crate::db::PoolManager;
use crate::error::PgResult;
use crate::mcp::PgService;
use crate::transport::Transport;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// Stdio transport implementation.
pub struct StdioTransport {
    pool: Arc<PoolManager>,
    backup_runner: Arc<BackupRunner>,
}

impl StdioTransport {
    /// Create a new stdio transport over the shared state.
    pub fn new(pool: Arc<PoolManager>, backup_runner: Arc<BackupRunner>) -> Self {
        Self {
            pool,
            backup_runner,
        }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> PgResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = PgService::new(self.pool.clone(), self.backup_runner.clone());

        let transport = stdio();
        let running_service = service.serve(transport).await.map_err(|e| {
            crate::error::PgError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stdio transport error");
                        return Err(crate::error::PgError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                true
            }
        };

        if shutdown_requested {
            // Spawn a task to listen for a second signal and force exit
            tokio::spawn(async {
                wait_for_signal().await;
                tracing::warn!("Received second signal, forcing immediate exit");
                std::process::exit(1);
            });
        }

        // Tear down the pool on shutdown
        info!("Closing connection pool");
        self.pool.close().await;

        if shutdown_requested {
            // Force exit since stdio may still be blocking on stdin
            // tokio::select! cannot interrupt blocking stdin reads
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdio_transport_creation() {
        let pool = Arc::new(PoolManager::new());
        let runner = Arc::new(BackupRunner::new("postgres://localhost/appdb"));
        let transport = StdioTransport::new(pool, runner);
        assert_eq!(transport.name(), "stdio");
    }
}
