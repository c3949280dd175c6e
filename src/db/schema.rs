//! Schema introspection.
//!
//! One information-schema query per call returns each table with its column
//! and constraint lists embedded as ordered JSON payloads, which are parsed
//! row by row into [`TableInfo`] structures. Targeted calls additionally
//! compute ranked name suggestions for requested tables that do not exist.
//! Results are produced fresh on every call; nothing is cached.

use crate::db::pool::PoolManager;
use crate::error::{PgError, PgResult};
use crate::models::{ColumnInfo, ConstraintInfo, MissingTableInfo, SchemaResult, TableInfo};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Maximum suggestions attached to one missing table.
const MAX_SUGGESTIONS: usize = 3;

/// Leading characters considered by the suggestion heuristic.
const PREFIX_WINDOW: usize = 3;

/// Schema inspector over the shared pool.
pub struct SchemaInspector {
    pool: Arc<PoolManager>,
}

impl SchemaInspector {
    /// Create an inspector over the shared pool.
    pub fn new(pool: Arc<PoolManager>) -> Self {
        Self { pool }
    }

    /// Introspect tables with their columns and constraints.
    ///
    /// With `tables`, only the named tables are returned and every requested
    /// name that does not exist gets a `missing_tables` entry with up to 3
    /// suggestions. Without `tables`, all base tables in scope are returned.
    /// Scope is the `public` schema, or every non-system schema when
    /// `all_schemas` is set.
    pub async fn get_schema(
        &self,
        tables: Option<&[String]>,
        all_schemas: bool,
    ) -> PgResult<SchemaResult> {
        let mut conn = self.pool.checkout().await?;

        let query = queries::table_details(all_schemas, tables.is_some());
        let rows = match tables {
            Some(names) => {
                sqlx::query(&query)
                    .bind(names)
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => sqlx::query(&query).fetch_all(&mut *conn).await?,
        };

        let mut found = Vec::with_capacity(rows.len());
        for row in &rows {
            found.push(parse_table_row(row)?);
        }

        let missing_tables = match tables {
            Some(names) => {
                let present: HashSet<&str> = found.iter().map(|t| t.name.as_str()).collect();
                let missing: Vec<&String> = names
                    .iter()
                    .filter(|name| !present.contains(name.as_str()))
                    .collect();

                if missing.is_empty() {
                    None
                } else {
                    let names_query = queries::table_names(all_schemas);
                    let existing: Vec<String> = sqlx::query_scalar(&names_query)
                        .fetch_all(&mut *conn)
                        .await?;
                    Some(
                        missing
                            .into_iter()
                            .map(|name| MissingTableInfo {
                                name: name.clone(),
                                suggestions: suggest_table_names(name, &existing),
                            })
                            .collect(),
                    )
                }
            }
            None => None,
        };

        debug!(
            tables = found.len(),
            missing = missing_tables.as_ref().map(|m: &Vec<MissingTableInfo>| m.len()).unwrap_or(0),
            all_schemas,
            "Introspected schema"
        );

        Ok(SchemaResult {
            tables: found,
            missing_tables,
        })
    }
}

/// Parse one result row, decoding the embedded JSON payloads.
fn parse_table_row(row: &PgRow) -> PgResult<TableInfo> {
    let schema: String = row.try_get("table_schema")?;
    let name: String = row.try_get("table_name")?;

    let columns_json: JsonValue = row.try_get("columns")?;
    let columns: Vec<ColumnInfo> = serde_json::from_value(columns_json)
        .map_err(|e| PgError::internal(format!("Malformed column payload for '{}': {}", name, e)))?;

    let constraints_json: JsonValue = row.try_get("constraints")?;
    let constraints: Vec<ConstraintInfo> = serde_json::from_value(constraints_json).map_err(|e| {
        PgError::internal(format!("Malformed constraint payload for '{}': {}", name, e))
    })?;

    Ok(TableInfo {
        schema,
        name,
        columns,
        constraints,
    })
}

/// Rank existing table names as suggestions for a missing one.
///
/// Candidates whose leading characters line up with the requested name
/// (within the first [`PREFIX_WINDOW`] characters) rank ahead of plain
/// substring matches; longer shared prefixes first, shorter names break
/// ties. Intentionally cheap and deterministic - not edit distance.
pub fn suggest_table_names(requested: &str, existing: &[String]) -> Vec<String> {
    let needle = requested.to_lowercase();
    let window = needle.chars().take(PREFIX_WINDOW).count();

    let mut ranked: Vec<(usize, usize, &String)> = Vec::new();
    for candidate in existing {
        let cand = candidate.to_lowercase();
        if cand == needle {
            continue;
        }

        let shared = cand
            .chars()
            .zip(needle.chars())
            .take(PREFIX_WINDOW)
            .take_while(|(a, b)| a == b)
            .count();

        let rank = if window > 0 && shared >= window.min(2) {
            PREFIX_WINDOW - shared
        } else if cand.contains(&needle) || needle.contains(&cand) {
            PREFIX_WINDOW + 1
        } else {
            continue;
        };

        ranked.push((rank, candidate.len(), candidate));
    }

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(b.2)));
    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, _, name)| name.clone())
        .collect()
}

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    const SCHEMA_PREDICATE_PUBLIC: &str = "t.table_schema = 'public'";
    const SCHEMA_PREDICATE_ALL: &str =
        "t.table_schema NOT IN ('pg_catalog', 'information_schema')";

    fn schema_predicate(all_schemas: bool) -> &'static str {
        if all_schemas {
            SCHEMA_PREDICATE_ALL
        } else {
            SCHEMA_PREDICATE_PUBLIC
        }
    }

    /// Table details with columns and constraints embedded as JSON arrays.
    pub fn table_details(all_schemas: bool, targeted: bool) -> String {
        let target_filter = if targeted {
            "\n              AND t.table_name = ANY($1)"
        } else {
            ""
        };
        format!(
            r#"
            SELECT
                t.table_schema,
                t.table_name,
                COALESCE((
                    SELECT json_agg(json_build_object(
                        'name', c.column_name,
                        'data_type', c.data_type,
                        'nullable', c.is_nullable = 'YES',
                        'default', c.column_default,
                        'max_length', c.character_maximum_length
                    ) ORDER BY c.ordinal_position)
                    FROM information_schema.columns c
                    WHERE c.table_schema = t.table_schema
                      AND c.table_name = t.table_name
                ), '[]'::json) AS columns,
                COALESCE((
                    SELECT json_agg(json_build_object(
                        'constraint_type', tc.constraint_type,
                        'name', tc.constraint_name,
                        'column', kcu.column_name
                    ) ORDER BY tc.constraint_name, kcu.ordinal_position)
                    FROM information_schema.table_constraints tc
                    LEFT JOIN information_schema.key_column_usage kcu
                        ON kcu.constraint_name = tc.constraint_name
                       AND kcu.constraint_schema = tc.constraint_schema
                       AND kcu.table_name = tc.table_name
                    WHERE tc.table_schema = t.table_schema
                      AND tc.table_name = t.table_name
                ), '[]'::json) AS constraints
            FROM information_schema.tables t
            WHERE t.table_type = 'BASE TABLE'
              AND {predicate}{target_filter}
            ORDER BY t.table_schema, t.table_name
            "#,
            predicate = schema_predicate(all_schemas),
            target_filter = target_filter,
        )
    }

    /// Bare table names in scope, for suggestion candidates.
    pub fn table_names(all_schemas: bool) -> String {
        format!(
            r#"
            SELECT t.table_name
            FROM information_schema.tables t
            WHERE t.table_type = 'BASE TABLE'
              AND {predicate}
            ORDER BY t.table_name
            "#,
            predicate = schema_predicate(all_schemas),
        )
    }
}
