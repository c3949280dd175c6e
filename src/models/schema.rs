//! Schema-related data models.
//!
//! This module defines the structures assembled by schema introspection.
//! Everything is produced fresh on each call; nothing is cached.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One column of a table, in ordinal order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInfo {
    pub name: String,
    /// information_schema data type (e.g., "integer", "character varying")
    pub data_type: String,
    pub nullable: bool,
    /// Default expression as reported by the server
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Declared length for character types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
}

/// One table constraint, possibly repeated per participating column.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintInfo {
    /// PRIMARY KEY, FOREIGN KEY, UNIQUE, CHECK
    pub constraint_type: String,
    pub name: String,
    /// Absent for table-level constraints with no key column entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// A table with its ordered columns and constraints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableInfo {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    /// Empty list when the table has no constraints, never absent
    pub constraints: Vec<ConstraintInfo>,
}

impl TableInfo {
    /// Get the fully qualified table name.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// A requested table that does not exist, with ranked name suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MissingTableInfo {
    pub name: String,
    /// Up to 3 existing table names, best match first
    pub suggestions: Vec<String>,
}

/// Result of a schema introspection call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaResult {
    pub tables: Vec<TableInfo>,
    /// Present only when at least one requested table was not found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_tables: Option<Vec<MissingTableInfo>>,
}
