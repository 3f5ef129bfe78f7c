//! Date normalization for [`crate::types::Dataset`] columns.
//!
//! Legacy workbooks carry dates in whatever shape the person entering them used: native
//! date cells, ISO text, slashed or dotted numeric text. [`normalize_date_columns`]
//! rewrites the configured columns to one canonical `YYYY-MM-DD` text form so every
//! sink sees a single representation.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{Dataset, Value};

/// Non-fatal conditions observed while normalizing one dataset.
///
/// These are returned as values rather than logged so callers (and tests) decide how to
/// surface them; the pipeline forwards them to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationWarning {
    /// A configured date column does not exist in this dataset; it was skipped.
    MissingColumn { column: String },
    /// `count` values in `column` could not be read as calendar dates and were
    /// rewritten to null.
    CoercedValues { column: String, count: usize },
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationWarning::MissingColumn { column } => {
                write!(f, "date column '{column}' not present, skipped")
            }
            NormalizationWarning::CoercedValues { column, count } => {
                write!(f, "{count} unparseable value(s) in '{column}' set to null")
            }
        }
    }
}

/// Text formats accepted for date values, tried in order.
///
/// Ambiguous `a/b/Y` text resolves month-first, then day-first, so every input has one
/// deterministic reading.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y", "%d/%m/%Y"];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Rewrites each configured column of `dataset` to canonical `YYYY-MM-DD` text, in
/// place.
///
/// Per column: if absent, a [`NormalizationWarning::MissingColumn`] is emitted and the
/// dataset is left untouched for that column. If present, every value is independently
/// reparsed; values that cannot be read as a calendar date become [`Value::Null`]. No
/// row is ever dropped, and re-running on already-canonical values is a no-op.
pub fn normalize_date_columns(
    dataset: &mut Dataset,
    date_columns: &[String],
) -> Vec<NormalizationWarning> {
    let mut warnings = Vec::new();

    for column in date_columns {
        let Some(idx) = dataset.column_index(column) else {
            warnings.push(NormalizationWarning::MissingColumn {
                column: column.clone(),
            });
            continue;
        };

        let mut coerced = 0usize;
        for row in &mut dataset.rows {
            let cell = &mut row[idx];
            match parse_date_value(cell) {
                Some(date) => *cell = Value::Text(date.format("%Y-%m-%d").to_string()),
                None => {
                    if !cell.is_null() {
                        coerced += 1;
                    }
                    *cell = Value::Null;
                }
            }
        }
        if coerced > 0 {
            warnings.push(NormalizationWarning::CoercedValues {
                column: column.clone(),
                count: coerced,
            });
        }
    }

    warnings
}

/// Interprets one value as a calendar date, if possible.
///
/// Native dates pass through; text is tried against the accepted formats; numbers and
/// nulls are not calendar dates.
pub fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => parse_date_text(s),
        Value::Number(_) | Value::Null => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}
