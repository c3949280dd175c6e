//! Backup-related data models.
//!
//! Backup options are explicit validated structs; the loosely-typed argument
//! map from the dispatch layer is converted through [`BackupFormat::parse`]
//! and [`crate::backup::validate_options`] before any side effect.

use crate::error::{PgError, PgResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format of the dump, mapping onto pg_dump's -F flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackupFormat {
    /// SQL text script
    #[default]
    Plain,
    /// pg_dump custom archive (supports compression and pg_restore)
    Custom,
    /// tar archive
    Tar,
    /// Directory of per-table files (supports parallel dump)
    Directory,
}

impl BackupFormat {
    /// Parse a format name, rejecting anything outside the four supported kinds.
    pub fn parse(s: &str) -> PgResult<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "custom" => Ok(Self::Custom),
            "tar" => Ok(Self::Tar),
            "directory" => Ok(Self::Directory),
            other => Err(PgError::validation(format!(
                "Invalid backup format: '{}'. Supported formats: plain, custom, tar, directory",
                other
            ))),
        }
    }

    /// pg_dump format flag value.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Plain => "p",
            Self::Custom => "c",
            Self::Tar => "t",
            Self::Directory => "d",
        }
    }

    /// File extension for default output naming. Directory format gets none.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::Plain => Some("sql"),
            Self::Custom => Some("dump"),
            Self::Tar => Some("tar"),
            Self::Directory => None,
        }
    }
}

impl std::fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Custom => write!(f, "custom"),
            Self::Tar => write!(f, "tar"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Validated options for one backup invocation.
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    pub format: BackupFormat,
    /// Dump only these tables (identifier-quoted when passed to pg_dump)
    pub tables: Vec<String>,
    /// Dump only these schemas (identifier-quoted when passed to pg_dump)
    pub schemas: Vec<String>,
    /// Dump data without schema definitions. Mutually exclusive with schema_only
    pub data_only: bool,
    /// Dump schema definitions without data. Mutually exclusive with data_only
    pub schema_only: bool,
    /// Compress the output (custom format only)
    pub compress: bool,
    /// Output destination; a timestamped name in the working directory when absent
    pub output_path: Option<PathBuf>,
}

/// Outcome of a backup invocation. Failures are captured, never raised.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackupResult {
    pub success: bool,
    /// Resolved output path, even on failure once resolution succeeded
    pub output_path: String,
    /// Best-effort output size; omission is not a failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// End-to-end duration including validation, in milliseconds
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackupResult {
    /// Create a failure result.
    pub fn failure(error: impl Into<String>, output_path: String, duration_ms: u64) -> Self {
        Self {
            success: false,
            output_path,
            size_bytes: None,
            duration_ms,
            error: Some(error.into()),
        }
    }
}
