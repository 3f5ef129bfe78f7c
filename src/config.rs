//! Run configuration.
//!
//! One immutable [`EtlConfig`] is built by the caller (directly or from a JSON file via
//! [`EtlConfig::from_json_path`]) and passed into [`crate::pipeline::Pipeline::new`].
//! Nothing in the crate reads process-wide state, so concurrent runs with distinct
//! configurations are safe as long as their outputs do not overlap.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::EtlResult;

/// What to do when the target database table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Keep the table and its rows; insert after them (create the table if absent).
    Append,
    /// Drop and recreate the table before inserting.
    Replace,
    /// Abort the load if the table already exists.
    Fail,
}

/// Connection and target-table settings for the relational sink.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: String,
    pub if_exists: ConflictPolicy,
}

/// Full configuration for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
    /// Glob pattern selecting the input workbooks, e.g. `input/*.xlsx`.
    pub input_pattern: String,
    /// Directory receiving one CSV per ingested sheet (created if absent).
    pub csv_output_dir: PathBuf,
    /// Workbook receiving the consolidated dataset.
    pub merged_workbook_path: PathBuf,
    /// Sheet inside the merged workbook that gets replaced with the consolidated data.
    pub merged_sheet_name: String,
    /// Columns rewritten to canonical `YYYY-MM-DD` text, in configuration order.
    pub date_columns: Vec<String>,
    /// Relational sink settings; also referenced by the fallback load template.
    #[serde(alias = "db_config")]
    pub db: DbConfig,
    /// When `false`, no database connection is made and a `LOAD DATA` template is
    /// printed instead.
    pub do_db_upload: bool,
}

impl EtlConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> EtlResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
