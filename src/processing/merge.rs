//! Dataset consolidation.

use crate::types::{Dataset, Value};

/// Concatenates `inputs` into one dataset named `name`.
///
/// The merged column set is the union of the inputs' columns in first-seen order: the
/// first dataset establishes the base order, later datasets contribute only columns not
/// already present, appended in their own order. Rows from a dataset lacking a column
/// carry [`Value::Null`] there. Records are never deduplicated; the provenance columns
/// already disambiguate identical-looking rows from different sheets.
///
/// An empty input sequence yields an empty dataset with no columns.
pub fn merge_datasets(name: impl Into<String>, inputs: &[Dataset]) -> Dataset {
    let mut columns: Vec<String> = Vec::new();
    for ds in inputs {
        for column in &ds.columns {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.clone());
            }
        }
    }

    let mut merged = Dataset::new(name, columns);
    for ds in inputs {
        // union position -> source position, fixed once per input dataset
        let projection: Vec<Option<usize>> = merged
            .columns
            .iter()
            .map(|c| ds.column_index(c))
            .collect();
        for row in &ds.rows {
            let cells = projection
                .iter()
                .map(|src| src.map_or(Value::Null, |i| row[i].clone()))
                .collect();
            merged.push_row(cells);
        }
    }
    merged
}
