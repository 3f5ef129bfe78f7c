//! Input stage: workbook discovery, sheet reads, and provenance tagging.
//!
//! [`workbook::ingest_workbooks`] expands a glob pattern and produces one
//! provenance-tagged [`crate::types::Dataset`] per (file, sheet) pair. The pipeline
//! never touches a sink when this stage fails: a pattern with zero matches or an
//! unreadable workbook aborts the run before any output exists.

pub mod provenance;
pub mod workbook;

pub use provenance::{tag_provenance, SOURCE_FILE_COLUMN, SOURCE_SHEET_COLUMN};
pub use workbook::{discover_workbooks, ingest_workbooks};
