//! Workbook discovery and sheet ingestion.
//!
//! [`ingest_workbooks`] is the pipeline's only input stage: it expands the configured
//! glob pattern, reads every sheet of every matched workbook into a [`Dataset`], and
//! tags each dataset with its provenance before returning.

use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{EtlError, EtlResult};
use crate::ingestion::provenance::tag_provenance;
use crate::types::{Dataset, SourceLocation, Value};

/// Expand `pattern` into the list of input workbook paths.
///
/// Paths come back in the glob iterator's deterministic (lexicographic) order. An empty
/// result is fatal: the run must not continue to any sink without input.
pub fn discover_workbooks(pattern: &str) -> EtlResult<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|source| EtlError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(|e| EtlError::Io(e.into_error()))?);
    }
    if paths.is_empty() {
        return Err(EtlError::Discovery {
            pattern: pattern.to_string(),
        });
    }
    Ok(paths)
}

/// Read every sheet of every workbook matching `pattern` into provenance-tagged
/// datasets, one per (file, sheet) pair, in discovery order then sheet order.
///
/// Dataset names are `{workbook_stem}_{sheet_name}` so downstream sinks produce stable
/// file names. Sheets with no cells at all are skipped; a workbook that cannot be
/// parsed aborts the whole run.
pub fn ingest_workbooks(pattern: &str) -> EtlResult<Vec<Dataset>> {
    let paths = discover_workbooks(pattern)?;

    let mut datasets = Vec::new();
    for path in &paths {
        let mut workbook = open_workbook_auto(path).map_err(|source| EtlError::Workbook {
            path: path.clone(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        for sheet in workbook.sheet_names().to_vec() {
            let range = workbook
                .worksheet_range(&sheet)
                .map_err(|source| EtlError::Workbook {
                    path: path.clone(),
                    source,
                })?;

            let Some(mut dataset) = dataset_from_range(format!("{stem}_{sheet}"), &range) else {
                continue;
            };
            tag_provenance(&mut dataset, &SourceLocation::new(file_name.clone(), sheet));
            datasets.push(dataset);
        }
    }
    Ok(datasets)
}

/// Convert one sheet range into a dataset: first non-empty row is the header, the rest
/// are data rows. Returns `None` for a sheet without a single non-empty row.
pub(crate) fn dataset_from_range(name: String, range: &calamine::Range<Data>) -> Option<Dataset> {
    let mut rows = range.rows().enumerate();
    let (header_idx, header_row) = rows.find(|(_, row)| {
        row.iter().any(|c| !matches!(c, Data::Empty))
    })?;

    let columns: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let header = cell_to_header_string(cell);
            if header.trim().is_empty() {
                format!("column_{i}")
            } else {
                header
            }
        })
        .collect();

    let mut dataset = Dataset::new(name, columns);
    for (idx, row) in range.rows().enumerate() {
        if idx <= header_idx {
            continue;
        }
        let cells = (0..dataset.columns.len())
            .map(|col| convert_cell(row.get(col).unwrap_or(&Data::Empty)))
            .collect();
        dataset.push_row(cells);
    }
    Some(dataset)
}

fn cell_to_header_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

/// Convert one cell into the pipeline's value model.
///
/// The model has no boolean or duration scalar, so those cells ingest as text; error
/// cells (`#DIV/0!` and friends) ingest as null.
fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Value::Date(ndt.date()),
            None => Value::Null,
        },
        Data::DateTimeIso(s) => parse_iso_cell(s),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

fn parse_iso_cell(s: &str) -> Value {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Value::Date(ndt.date());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Value::Date(d);
    }
    Value::Text(s.to_string())
}
