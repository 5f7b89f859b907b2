//! Load → normalize → filter → aggregate, with one error type across stages.

use crate::data::{
    DataLoader, DataProcessor, Dataset, FilterError, LoaderError, MonthKey, Period,
    ProcessorError,
};
use crate::stats::{AggregateError, DashboardMetrics};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] ProcessorError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Load and normalize the dataset at `path`. Nothing past the first
/// failing stage runs.
pub fn load_dataset(path: &Path) -> Result<Dataset, PipelineError> {
    let raw = DataLoader::load(path)?;
    let dataset = DataProcessor::normalize(&raw)?;
    info!(rows = dataset.height(), "dataset ready");
    Ok(dataset)
}

/// One recomputation pass: the filtered view plus its metrics.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub view: Dataset,
    pub metrics: DashboardMetrics,
}

impl Snapshot {
    pub fn compute(base: &Dataset, period: Period) -> Result<Self, PipelineError> {
        let view = base.filter_by_period(period)?;
        let metrics = DashboardMetrics::compute(base, &view, period)?;
        Ok(Self { view, metrics })
    }
}

/// Months available to the selector.
pub fn available_months(base: &Dataset) -> Result<Vec<MonthKey>, PipelineError> {
    Ok(base.distinct_months()?)
}
