use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::aggregate::{CombinedTable, FactorAggregator};
use crate::config::ResolvedConfig;
use crate::download::{self, FactorSource};
use crate::error::FactorError;
use crate::loader::{DatasetLoader, TableSet};
use crate::workbook::WorkbookWriter;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Fetch every archive before loading instead of reusing files on disk.
    pub download: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub data_dir: String,
    pub output: String,
    pub downloaded_bytes: Option<u64>,
    pub min_period: String,
    pub datasets: Vec<DatasetSummary>,
    pub sheets: Vec<SheetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub id: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetSummary {
    pub factor: String,
    pub datasets: Vec<String>,
    pub rows: usize,
    pub first_period: Option<String>,
    pub last_period: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<S: FactorSource> {
    config: ResolvedConfig,
    source: S,
}

impl<S: FactorSource> App<S> {
    pub fn new(config: ResolvedConfig, source: S) -> Self {
        Self { config, source }
    }

    /// Download (optional) → load → aggregate → write. Any failure stops the
    /// run before the workbook is committed.
    pub fn run(&self, options: RunOptions, sink: &dyn ProgressSink) -> Result<RunResult, FactorError> {
        let data_dir = self.config.data_dir.as_std_path();

        let downloaded_bytes = if options.download {
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Download; fetching {} archives",
                    self.config.datasets.len()
                ),
                elapsed: None,
            });
            let start = Instant::now();
            let bytes = download::download_all(&self.source, &self.config.datasets, data_dir)?;
            sink.event(ProgressEvent {
                message: format!("phase=Download; {bytes} bytes"),
                elapsed: Some(start.elapsed()),
            });
            Some(bytes)
        } else {
            None
        };

        sink.event(ProgressEvent {
            message: format!("phase=Load; reading archives from {}", self.config.data_dir),
            elapsed: None,
        });
        let start = Instant::now();
        let tables = self.load()?;
        sink.event(ProgressEvent {
            message: format!("phase=Load; parsed {} tables", tables.len()),
            elapsed: Some(start.elapsed()),
        });

        sink.event(ProgressEvent {
            message: "phase=Aggregate; combining factors".to_string(),
            elapsed: None,
        });
        let combined = self.aggregate(&tables)?;

        sink.event(ProgressEvent {
            message: format!("phase=Write; {}", self.config.output),
            elapsed: None,
        });
        WorkbookWriter::new().write(self.config.output.as_std_path(), &combined)?;
        info!(output = %self.config.output, sheets = combined.len(), "run complete");

        Ok(RunResult {
            data_dir: self.config.data_dir.to_string(),
            output: self.config.output.to_string(),
            downloaded_bytes,
            min_period: self.config.cutoff.to_string(),
            datasets: summarize_datasets(&tables),
            sheets: combined.iter().map(summarize_sheet).collect(),
        })
    }

    pub fn load(&self) -> Result<TableSet, FactorError> {
        DatasetLoader::new(self.config.data_dir.as_std_path()).load_all(&self.config.datasets)
    }

    pub fn aggregate(&self, tables: &TableSet) -> Result<Vec<CombinedTable>, FactorError> {
        FactorAggregator::new(self.config.factors.clone(), self.config.cutoff).aggregate_all(tables)
    }
}

fn summarize_datasets(tables: &TableSet) -> Vec<DatasetSummary> {
    tables
        .iter()
        .map(|(id, table)| DatasetSummary {
            id: id.to_string(),
            rows: table.len(),
            columns: table.value_columns().to_vec(),
        })
        .collect()
}

fn summarize_sheet(table: &CombinedTable) -> SheetSummary {
    let periods = table.periods();
    SheetSummary {
        factor: table.factor().to_string(),
        datasets: table.columns().iter().map(ToString::to_string).collect(),
        rows: table.rows().len(),
        first_period: periods.first().map(|period| period.to_string()),
        last_period: periods.last().map(|period| period.to_string()),
    }
}
