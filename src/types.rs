//! Core data model types for the pipeline.
//!
//! Every sheet read from an input workbook becomes a named [`Dataset`] whose cells are
//! dynamically typed [`Value`]s. Datasets are transformed in memory (date normalization,
//! provenance tagging, merge) and then handed to the sinks.

use std::fmt;

use chrono::NaiveDate;

/// A single dynamically typed cell value.
///
/// Spreadsheet cells carry no declared schema, so values stay tagged through the whole
/// pipeline; no variant is implicitly narrowed during normalization or merge.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty cell.
    Null,
    /// UTF-8 text.
    Text(String),
    /// Numeric cell (spreadsheets store all numbers as 64-bit floats).
    Number(f64),
    /// Native calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Renders the sink text form of a value.
///
/// `Null` renders as the empty string, dates as `YYYY-MM-DD`, and numbers with an
/// integral value without a decimal point (`3.0` renders as `3`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Identifies the physical origin of a dataset: which workbook file and which sheet.
///
/// Stamped onto every record as two provenance columns; never mutated after tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Workbook file name, including extension.
    pub file: String,
    /// Sheet name inside the workbook.
    pub sheet: String,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(file: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: sheet.into(),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored row-major in the same order as `columns`. Column order is insertion
/// order; appending a column never reorders existing ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Dataset name; sinks derive file and sheet names from it.
    pub name: String,
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Row-major cell storage.
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with the given columns.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a dataset from columns and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row's length differs from the column count.
    pub fn with_rows(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let mut ds = Self::new(name, columns);
        for row in rows {
            ds.push_row(row);
        }
        ds
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append one row.
    ///
    /// # Panics
    ///
    /// Panics if the row's length differs from the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        assert!(
            row.len() == self.columns.len(),
            "row length {} does not match column count {}",
            row.len(),
            self.columns.len()
        );
        self.rows.push(row);
    }

    /// Append a new column at the end, filling every existing row from `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold exactly one value per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) {
        assert!(
            values.len() == self.rows.len(),
            "column length {} does not match row count {}",
            values.len(),
            self.rows.len()
        );
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, Value};
    use chrono::NaiveDate;

    #[test]
    fn display_renders_sink_text_forms() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Text("Müller".to_string()).to_string(), "Müller");
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(98.25).to_string(), "98.25");
        let d = NaiveDate::from_ymd_opt(1990, 5, 2).unwrap();
        assert_eq!(Value::Date(d).to_string(), "1990-05-02");
    }

    #[test]
    fn push_column_appends_after_existing_columns() {
        let mut ds = Dataset::with_rows(
            "t",
            vec!["a".to_string()],
            vec![vec![Value::Number(1.0)], vec![Value::Number(2.0)]],
        );
        ds.push_column("b", vec![Value::Text("x".to_string()), Value::Null]);

        assert_eq!(ds.columns, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            ds.rows[0],
            vec![Value::Number(1.0), Value::Text("x".to_string())]
        );
        assert_eq!(ds.rows[1], vec![Value::Number(2.0), Value::Null]);
    }

    #[test]
    #[should_panic(expected = "row length")]
    fn push_row_panics_on_arity_mismatch() {
        let mut ds = Dataset::new("t", vec!["a".to_string(), "b".to_string()]);
        ds.push_row(vec![Value::Null]);
    }
}
