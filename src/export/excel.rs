//! Spreadsheet sink: sheet-level replace, file-level preserve.

use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use rust_xlsxwriter::Workbook;

use crate::error::{EtlError, EtlResult};
use crate::ingestion::workbook::dataset_from_range;
use crate::types::{Dataset, Value};

/// Writes `dataset` into sheet `sheet_name` of the workbook at `path`.
///
/// If the workbook does not exist it is created fresh with only that sheet. If it
/// exists, every other sheet is read back and rewritten unchanged while the target
/// sheet is replaced; spreadsheet formats offer no partial-sheet patch, so the whole
/// workbook structure is rebuilt on each write.
pub fn write_merged_sheet(path: &Path, sheet_name: &str, dataset: &Dataset) -> EtlResult<()> {
    let existing = if path.exists() {
        read_sheets(path)?
    } else {
        Vec::new()
    };

    let mut workbook = Workbook::new();
    let mut replaced = false;
    for (name, sheet) in &existing {
        if name == sheet_name {
            write_sheet(&mut workbook, sheet_name, dataset)?;
            replaced = true;
        } else {
            write_sheet(&mut workbook, name, sheet)?;
        }
    }
    if !replaced {
        write_sheet(&mut workbook, sheet_name, dataset)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Reads every sheet of an existing workbook in order, keeping sheets with no cells as
/// empty datasets so they survive the rewrite.
fn read_sheets(path: &Path) -> EtlResult<Vec<(String, Dataset)>> {
    let mut workbook = open_workbook_auto(path).map_err(|source| EtlError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names().to_vec() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| EtlError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;
        let dataset = dataset_from_range(name.clone(), &range)
            .unwrap_or_else(|| Dataset::new(name.clone(), Vec::new()));
        sheets.push((name, dataset));
    }
    Ok(sheets)
}

fn write_sheet(workbook: &mut Workbook, name: &str, dataset: &Dataset) -> EtlResult<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    for (col, header) in dataset.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, header.as_str())?;
    }
    for (r, row) in dataset.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            match value {
                Value::Null => {}
                Value::Number(n) => {
                    worksheet.write_number((r + 1) as u32, c as u16, *n)?;
                }
                other => {
                    let text = other.to_string();
                    worksheet.write_string((r + 1) as u32, c as u16, text.as_str())?;
                }
            }
        }
    }
    Ok(())
}
