//! MCP service implementation using rmcp.
//!
//! This module defines the PgService struct with all database tools exposed
//! via the MCP protocol using the rmcp framework's macros.

use crate::backup::BackupRunner;
use crate::db::{PoolManager, PoolStats};
use crate::tools::backup::{BackupInput, BackupOutput, BackupToolHandler};
use crate::tools::query::{ExecuteFileInput, QueryInput, QueryOutput, QueryToolHandler};
use crate::tools::schema::{GetSchemaInput, GetSchemaOutput, SchemaToolHandler};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PgService {
    /// Shared pool manager for query and schema operations
    pool: Arc<PoolManager>,
    /// Backup runner over the raw connection descriptor (bypasses the pool)
    backup_runner: Arc<BackupRunner>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl PgService {
    /// Create a new PgService instance.
    pub fn new(pool: Arc<PoolManager>, backup_runner: Arc<BackupRunner>) -> Self {
        Self {
            pool,
            backup_runner,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PgService {
    #[tool(
        description = "Execute a single SQL statement.\nBy default the statement is wrapped in a transaction and rolled back on error.\nSet transactional=false to run without the envelope. An optional timeout_ms is enforced server-side."
    )]
    async fn query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        let handler = QueryToolHandler::new(self.pool.clone());
        handler.query(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Execute a SQL file.\nThe file is read from the server working directory (or an absolute path) and run through the same transactional envelope as `query`."
    )]
    async fn execute_file(
        &self,
        Parameters(input): Parameters<ExecuteFileInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        let handler = QueryToolHandler::new(self.pool.clone());
        handler
            .execute_file(input)
            .await
            .map(Json)
            .map_err(Into::into)
    }

    #[tool(
        description = "Introspect the database schema.\nReturns tables with ordered columns and constraints. Pass `tables` to target specific tables; names that do not exist come back under `missing_tables` with up to 3 suggestions.\nSet all_schemas=true to include every non-system schema instead of only `public`."
    )]
    async fn get_schema(
        &self,
        Parameters(input): Parameters<GetSchemaInput>,
    ) -> Result<Json<GetSchemaOutput>, McpError> {
        let handler = SchemaToolHandler::new(self.pool.clone());
        handler.get_schema(input).await.map(Json).map_err(Into::into)
    }

    #[tool(
        description = "Create a physical backup with pg_dump.\nFormats: plain (SQL text), custom, tar, directory. Optional table/schema filters, data-only or schema-only, compression (custom format).\nNever raises: inspect `success` and `error` in the result."
    )]
    async fn backup(&self, Parameters(input): Parameters<BackupInput>) -> Json<BackupOutput> {
        let handler = BackupToolHandler::new(self.backup_runner.clone());
        Json(handler.backup(input).await)
    }

    #[tool(
        description = "Report connection pool counters: total open connections, idle connections, and callers waiting for a lease."
    )]
    async fn pool_stats(&self) -> Json<PoolStats> {
        Json(self.pool.stats().await)
    }
}

#[tool_handler]
impl ServerHandler for PgService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pg-mcp-server".to_owned(),
                title: Some("PostgreSQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Safe ad-hoc access to one PostgreSQL database.\n\
                \n\
                ## Tools\n\
                - `query`: run one SQL statement inside a transaction (rolled back on error)\n\
                - `execute_file`: run a SQL file through the same envelope\n\
                - `get_schema`: tables, columns, constraints; unknown table names get suggestions\n\
                - `backup`: pg_dump backup (plain/custom/tar/directory); check `success` in the result\n\
                - `pool_stats`: connection pool counters\n\
                \n\
                ## Notes\n\
                - One logical statement per `query` call; BEGIN/COMMIT/ROLLBACK are not auto-wrapped\n\
                - `timeout_ms` is enforced by the server via statement_timeout\n\
                - Backups run pg_dump on the server host; output paths resolve against its working directory"
                    .to_string(),
            ),
        }
    }
}
