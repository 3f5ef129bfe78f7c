//! Flat-file sink: one CSV per dataset.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EtlResult;
use crate::types::Dataset;

/// Writes `dataset` as `{dataset.name}.csv` inside `dir`, creating the directory if it
/// does not exist yet.
///
/// Output is UTF-8 with a header row of column names; null cells become empty fields.
/// A pre-existing file of the same name is overwritten without warning. Returns the
/// path of the written file.
pub fn write_csv(dir: &Path, dataset: &Dataset) -> EtlResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", dataset.name));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;
    Ok(path)
}
