//! Progress and warning reporting for pipeline runs.
//!
//! The pipeline reports stage completions and normalization warnings through an
//! observer instead of writing to a logger directly, so embedding applications decide
//! where diagnostics go (stderr, a log file, a test recorder).

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::processing::dates::NormalizationWarning;

/// A completed pipeline stage, with enough context to narrate the run.
#[derive(Debug, Clone)]
pub enum StageEvent {
    /// One (file, sheet) pair was read and provenance-tagged.
    DatasetIngested { name: String, rows: usize },
    /// One per-sheet flat file was written.
    CsvWritten { path: PathBuf, rows: usize },
    /// All datasets were concatenated.
    MergeCompleted { rows: usize, columns: usize },
    /// The consolidated sheet was written into the target workbook.
    WorkbookWritten {
        path: PathBuf,
        sheet: String,
        rows: usize,
    },
    /// The database load finished.
    UploadCompleted { table: String, rows: u64 },
}

impl fmt::Display for StageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageEvent::DatasetIngested { name, rows } => {
                write!(f, "ingested dataset '{name}' ({rows} rows)")
            }
            StageEvent::CsvWritten { path, rows } => {
                write!(f, "csv written: {} ({rows} rows)", path.display())
            }
            StageEvent::MergeCompleted { rows, columns } => {
                write!(f, "merged {rows} rows across {columns} columns")
            }
            StageEvent::WorkbookWritten { path, sheet, rows } => {
                write!(
                    f,
                    "workbook written: {} / {sheet} ({rows} rows)",
                    path.display()
                )
            }
            StageEvent::UploadCompleted { table, rows } => {
                write!(f, "uploaded {rows} rows into table '{table}'")
            }
        }
    }
}

/// Observer interface for pipeline progress.
///
/// All methods default to no-ops, so implementors pick only the callbacks they need.
pub trait PipelineObserver: Send + Sync {
    /// Called after each completed stage.
    fn on_stage(&self, _event: &StageEvent) {}

    /// Called for every non-fatal normalization warning, with the dataset it came from.
    fn on_warning(&self, _dataset: &str, _warning: &NormalizationWarning) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage(&self, event: &StageEvent) {
        for o in &self.observers {
            o.on_stage(event);
        }
    }

    fn on_warning(&self, dataset: &str, warning: &NormalizationWarning) {
        for o in &self.observers {
            o.on_warning(dataset, warning);
        }
    }
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_stage(&self, event: &StageEvent) {
        eprintln!("[etl] {event}");
    }

    fn on_warning(&self, dataset: &str, warning: &NormalizationWarning) {
        eprintln!("[etl][warn] {dataset}: {warning}");
    }
}

/// Appends pipeline events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage(&self, event: &StageEvent) {
        self.append_line(&format!("{} {event}", unix_ts()));
    }

    fn on_warning(&self, dataset: &str, warning: &NormalizationWarning) {
        self.append_line(&format!("{} warn {dataset}: {warning}", unix_ts()));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
