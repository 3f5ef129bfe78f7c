//! `workbook-etl` is a small library for batch-consolidating legacy spreadsheet data:
//! it ingests every sheet of every workbook matching a glob pattern into an in-memory
//! [`types::Dataset`], normalizes configured date columns to `YYYY-MM-DD`, writes one
//! CSV per sheet, merges everything into one dataset, persists the result into a sheet
//! of a target workbook, and optionally bulk-loads it into a MariaDB/MySQL table.
//!
//! The primary entrypoint is [`pipeline::Pipeline`], driven by one immutable
//! [`config::EtlConfig`]:
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use workbook_etl::config::{ConflictPolicy, DbConfig, EtlConfig};
//! use workbook_etl::pipeline::Pipeline;
//!
//! # fn main() -> Result<(), workbook_etl::EtlError> {
//! let config = EtlConfig {
//!     input_pattern: "input/*.xlsx".to_string(),
//!     csv_output_dir: PathBuf::from("out"),
//!     merged_workbook_path: PathBuf::from("LOAD DATA.xlsx"),
//!     merged_sheet_name: "Karte7".to_string(),
//!     date_columns: vec!["Geburtsdatum".to_string()],
//!     db: DbConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 3306,
//!         user: "app_user".to_string(),
//!         password: "secret".to_string(),
//!         database: "crm".to_string(),
//!         table: "customers".to_string(),
//!         if_exists: ConflictPolicy::Replace,
//!     },
//!     do_db_upload: false,
//! };
//!
//! let summary = Pipeline::new(config).run()?;
//! println!("merged {} rows", summary.merged_rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Behavior highlights
//!
//! - **Provenance**: every record gains `__source_file` / `__source_sheet` columns, so
//!   merged rows stay traceable to their origin.
//! - **Date normalization** ([`processing::dates`]): accepts native date cells, ISO
//!   date/time text, and slashed or dotted numeric text; unparseable values become
//!   null, never dropped rows. The transform is idempotent.
//! - **Merge** ([`processing::merge`]): pure concatenation with first-seen column
//!   union and null fill; no deduplication and no type reconciliation.
//! - **Sheet replace** ([`export::excel`]): writing the merged sheet preserves every
//!   other sheet already present in the target workbook.
//! - **Fail fast**: everything except date-normalization warnings aborts the run with
//!   an [`EtlError`]; partial output across sinks is never silently tolerated.
//!
//! ## Modules
//!
//! - [`ingestion`]: glob discovery, workbook reads, provenance tagging
//! - [`processing`]: in-memory transforms (dates, merge)
//! - [`export`]: CSV, workbook, and database sinks
//! - [`pipeline`]: orchestration and the run summary
//! - [`config`] / [`error`] / [`observability`] / [`types`]: support types

pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{EtlError, EtlResult};
