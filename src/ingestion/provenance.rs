//! Provenance tagging for ingested datasets.

use crate::types::{Dataset, SourceLocation, Value};

/// Column recording the originating workbook file name.
pub const SOURCE_FILE_COLUMN: &str = "__source_file";
/// Column recording the originating sheet name.
pub const SOURCE_SHEET_COLUMN: &str = "__source_sheet";

/// Appends the two provenance columns to `dataset`, stamping `origin` onto every row.
///
/// The transform is 1:1: no row is added or dropped, and the provenance columns land
/// after all existing columns.
pub fn tag_provenance(dataset: &mut Dataset, origin: &SourceLocation) {
    let rows = dataset.row_count();
    dataset.push_column(
        SOURCE_FILE_COLUMN,
        vec![Value::Text(origin.file.clone()); rows],
    );
    dataset.push_column(
        SOURCE_SHEET_COLUMN,
        vec![Value::Text(origin.sheet.clone()); rows],
    );
}
