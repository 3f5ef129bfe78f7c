//! Run orchestration.
//!
//! [`Pipeline::run`] drives the whole batch in one synchronous call chain:
//! ingest → normalize + per-sheet CSV → merge → merged workbook → optional database
//! load. Every fatal condition propagates as an [`crate::error::EtlError`]; the caller
//! decides what to do with it (typically: print and exit non-zero).

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::EtlConfig;
use crate::error::EtlResult;
use crate::export::{load_data_template, load_dataset, write_csv, write_merged_sheet};
use crate::ingestion::ingest_workbooks;
use crate::observability::{PipelineObserver, StageEvent};
use crate::processing::{merge_datasets, normalize_date_columns};

/// Per-dataset row accounting for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub name: String,
    pub rows: usize,
}

/// What one completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Each ingested dataset with its row count, in processing order.
    pub datasets: Vec<DatasetSummary>,
    /// Per-sheet flat files, in processing order.
    pub csv_files: Vec<PathBuf>,
    /// Row count of the consolidated dataset.
    pub merged_rows: usize,
    /// Rows inserted by the relational sink, when the upload ran.
    pub uploaded_rows: Option<u64>,
    /// The bulk-load command template, when the upload was disabled.
    pub load_template: Option<String>,
}

/// The batch pipeline: one immutable configuration, one run per invocation.
pub struct Pipeline {
    config: EtlConfig,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl Pipeline {
    /// Create a pipeline for `config`.
    pub fn new(config: EtlConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Attach an observer receiving stage events and normalization warnings.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Execute the full batch.
    ///
    /// Stops at the first fatal error; only date-normalization conditions are recovered
    /// locally (see [`crate::processing::dates::NormalizationWarning`]). No dataset
    /// reaches the relational sink unless `do_db_upload` is set; with the upload
    /// disabled, a `LOAD DATA` template is printed to standard output instead.
    pub fn run(&self) -> EtlResult<RunSummary> {
        let cfg = &self.config;
        let mut datasets = ingest_workbooks(&cfg.input_pattern)?;

        let mut summaries = Vec::with_capacity(datasets.len());
        let mut csv_files = Vec::with_capacity(datasets.len());
        for dataset in &mut datasets {
            self.notify(StageEvent::DatasetIngested {
                name: dataset.name.clone(),
                rows: dataset.row_count(),
            });

            for warning in normalize_date_columns(dataset, &cfg.date_columns) {
                if let Some(observer) = &self.observer {
                    observer.on_warning(&dataset.name, &warning);
                }
            }

            let path = write_csv(&cfg.csv_output_dir, dataset)?;
            self.notify(StageEvent::CsvWritten {
                path: path.clone(),
                rows: dataset.row_count(),
            });
            csv_files.push(path);
            summaries.push(DatasetSummary {
                name: dataset.name.clone(),
                rows: dataset.row_count(),
            });
        }

        let merged = merge_datasets(cfg.merged_sheet_name.clone(), &datasets);
        self.notify(StageEvent::MergeCompleted {
            rows: merged.row_count(),
            columns: merged.columns.len(),
        });

        write_merged_sheet(&cfg.merged_workbook_path, &cfg.merged_sheet_name, &merged)?;
        self.notify(StageEvent::WorkbookWritten {
            path: cfg.merged_workbook_path.clone(),
            sheet: cfg.merged_sheet_name.clone(),
            rows: merged.row_count(),
        });

        let mut uploaded_rows = None;
        let mut load_template = None;
        if cfg.do_db_upload {
            let rows = load_dataset(&cfg.db, &merged)?;
            self.notify(StageEvent::UploadCompleted {
                table: cfg.db.table.clone(),
                rows,
            });
            uploaded_rows = Some(rows);
        } else {
            let template = load_data_template(&cfg.csv_output_dir, &cfg.db);
            println!("{template}");
            load_template = Some(template);
        }

        Ok(RunSummary {
            datasets: summaries,
            csv_files,
            merged_rows: merged.row_count(),
            uploaded_rows,
            load_template,
        })
    }

    fn notify(&self, event: StageEvent) {
        if let Some(observer) = &self.observer {
            observer.on_stage(&event);
        }
    }
}
