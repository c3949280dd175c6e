//! Schema introspection tool.

use crate::db::{PoolManager, SchemaInspector};
use crate::error::PgResult;
use crate::models::{MissingTableInfo, SchemaResult, TableInfo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input for the get_schema tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetSchemaInput {
    /// Restrict to these table names. Omit to introspect every table in scope
    #[serde(default)]
    pub tables: Option<Vec<String>>,
    /// Include all non-system schemas instead of only "public"
    #[serde(default)]
    pub all_schemas: bool,
}

/// Output from the get_schema tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetSchemaOutput {
    /// Tables with ordered columns and constraints
    pub tables: Vec<TableInfo>,
    /// Requested tables that do not exist, with ranked suggestions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_tables: Option<Vec<MissingTableInfo>>,
    /// Number of tables returned
    pub table_count: usize,
}

impl From<SchemaResult> for GetSchemaOutput {
    fn from(result: SchemaResult) -> Self {
        Self {
            table_count: result.tables.len(),
            tables: result.tables,
            missing_tables: result.missing_tables,
        }
    }
}

/// Handler for the schema tool.
pub struct SchemaToolHandler {
    inspector: SchemaInspector,
}

impl SchemaToolHandler {
    /// Create a new schema tool handler.
    pub fn new(pool: Arc<PoolManager>) -> Self {
        Self {
            inspector: SchemaInspector::new(pool),
        }
    }

    /// Introspect the database schema.
    pub async fn get_schema(&self, input: GetSchemaInput) -> PgResult<GetSchemaOutput> {
        self.inspector
            .get_schema(input.tables.as_deref(), input.all_schemas)
            .await
            .map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults() {
        let input: GetSchemaInput = serde_json::from_str("{}").unwrap();
        assert!(input.tables.is_none());
        assert!(!input.all_schemas);
    }

    #[test]
    fn test_output_counts_tables() {
        let result = SchemaResult {
            tables: vec![TableInfo {
                schema: "public".to_string(),
                name: "users".to_string(),
                columns: Vec::new(),
                constraints: Vec::new(),
            }],
            missing_tables: None,
        };
        let output = GetSchemaOutput::from(result);
        assert_eq!(output.table_count, 1);
        assert!(output.missing_tables.is_none());
    }

    #[test]
    fn test_missing_tables_omitted_from_json_when_none() {
        let output = GetSchemaOutput {
            tables: Vec::new(),
            missing_tables: None,
            table_count: 0,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("missing_tables"));
    }
}
