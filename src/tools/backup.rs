//! Backup tool.
//!
//! The tool never raises: option parsing and every downstream failure are
//! captured into the output's `error` field with `success: false`.

use crate::backup::BackupRunner;
use crate::models::{BackupFormat, BackupOptions, BackupResult};
use humansize::{format_size, DECIMAL};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

fn default_format() -> String {
    "plain".to_string()
}

/// Input for the backup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BackupInput {
    /// Output format: plain, custom, tar, or directory. Default: plain
    #[serde(default = "default_format")]
    pub format: String,
    /// Dump only these tables
    #[serde(default)]
    pub tables: Vec<String>,
    /// Dump only these schemas
    #[serde(default)]
    pub schemas: Vec<String>,
    /// Dump data without schema definitions. Mutually exclusive with schema_only
    #[serde(default)]
    pub data_only: bool,
    /// Dump schema definitions without data. Mutually exclusive with data_only
    #[serde(default)]
    pub schema_only: bool,
    /// Compress the output (custom format only)
    #[serde(default)]
    pub compress: bool,
    /// Output destination; a timestamped file in the working directory when omitted
    #[serde(default)]
    pub output_path: Option<String>,
}

/// Output from the backup tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BackupOutput {
    pub success: bool,
    /// Resolved output path
    pub output_path: String,
    /// Output size in bytes, when it could be measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Human-readable output size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,
    /// End-to-end duration in milliseconds, validation included
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<BackupResult> for BackupOutput {
    fn from(result: BackupResult) -> Self {
        Self {
            success: result.success,
            output_path: result.output_path,
            size_human: result.size_bytes.map(|s| format_size(s, DECIMAL)),
            size_bytes: result.size_bytes,
            duration_ms: result.duration_ms,
            error: result.error,
        }
    }
}

/// Handler for the backup tool.
pub struct BackupToolHandler {
    runner: Arc<BackupRunner>,
}

impl BackupToolHandler {
    /// Create a new backup tool handler.
    pub fn new(runner: Arc<BackupRunner>) -> Self {
        Self { runner }
    }

    /// Produce a backup. Inspect `success` in the output; this never raises.
    pub async fn backup(&self, input: BackupInput) -> BackupOutput {
        let start = Instant::now();

        let format = match BackupFormat::parse(&input.format) {
            Ok(format) => format,
            Err(e) => {
                return BackupResult::failure(
                    e.to_string(),
                    input.output_path.unwrap_or_default(),
                    start.elapsed().as_millis() as u64,
                )
                .into();
            }
        };

        let options = BackupOptions {
            format,
            tables: input.tables,
            schemas: input.schemas,
            data_only: input.data_only,
            schema_only: input.schema_only,
            compress: input.compress,
            output_path: input.output_path.map(PathBuf::from),
        };

        self.runner.run(&options).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults_to_plain_format() {
        let input: BackupInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.format, "plain");
        assert!(!input.data_only);
        assert!(!input.schema_only);
        assert!(input.output_path.is_none());
    }

    #[tokio::test]
    async fn test_invalid_format_captured_not_raised() {
        let handler = BackupToolHandler::new(Arc::new(BackupRunner::new(
            "postgres://localhost/appdb",
        )));
        let input: BackupInput = serde_json::from_str(r#"{"format": "sql"}"#).unwrap();
        let output = handler.backup(input).await;
        assert!(!output.success);
        assert!(output.error.unwrap().contains("Invalid backup format"));
    }

    #[test]
    fn test_output_includes_human_size() {
        let result = BackupResult {
            success: true,
            output_path: "/tmp/out.sql".to_string(),
            size_bytes: Some(1_500_000),
            duration_ms: 12,
            error: None,
        };
        let output = BackupOutput::from(result);
        assert_eq!(output.size_bytes, Some(1_500_000));
        assert_eq!(output.size_human.as_deref(), Some("1.5 MB"));
    }
}
