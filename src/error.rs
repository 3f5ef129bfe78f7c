use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type EtlResult<T> = Result<T, EtlError>;

/// Error type returned by every fallible operation in the crate.
///
/// All variants are fatal for a run: the orchestrator stops at the first error and
/// returns it to the caller. Recoverable conditions (absent date columns, unparseable
/// date values) are modeled as [`crate::processing::dates::NormalizationWarning`]
/// values instead, not as errors.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The input glob pattern itself is malformed.
    #[error("invalid input pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// No input workbook matched the configured pattern.
    #[error("no input workbooks match pattern '{pattern}'")]
    Discovery { pattern: String },

    /// A matched file could not be read as a structured workbook.
    #[error("cannot read workbook '{}': {}", .path.display(), .source)]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },

    /// Underlying I/O error (directory creation, file writes).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Flat-file export error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook export error.
    #[error("excel write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The `fail` conflict policy found the target table already present.
    #[error("table '{table}' already exists and conflict policy is 'fail'")]
    TableExists { table: String },

    /// Database connection or insertion failure.
    #[error("upload into table '{table}' failed: {source}")]
    Upload { table: String, source: sqlx::Error },

    /// A configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
