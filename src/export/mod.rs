//! Output sinks.
//!
//! Three sinks consume datasets, each with its own failure contract:
//!
//! - [`csv::write_csv`]: one UTF-8 flat file per dataset, overwrite on name collision
//! - [`excel::write_merged_sheet`]: replace one sheet of the target workbook,
//!   preserving every other sheet
//! - [`database::load_dataset`]: batched inserts under an append/replace/fail policy
//!
//! All sink failures are fatal for the run; none of them retries.

pub mod csv;
pub mod database;
pub mod excel;

pub use csv::write_csv;
pub use database::{load_data_template, load_dataset, INSERT_BATCH_ROWS};
pub use excel::write_merged_sheet;
