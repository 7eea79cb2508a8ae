use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no observations available in the dataset")]
    NoDataAvailable,

    #[error("failed to read table file '{0}'")]
    TableNotFound(PathBuf, #[source] std::io::Error),

    #[error("failed to scan table file '{0}'")]
    TableScan(PathBuf, #[source] PolarsError),

    #[error("unsupported table format for '{0}', expected .parquet or .csv")]
    UnsupportedTableFormat(PathBuf),

    #[error("failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("observation row has a null date")]
    NullObservationDate,

    // Raw day offset that could not be converted back to a calendar date.
    #[error("observation date value {0} is not representable")]
    CorruptDate(i32),

    #[error("background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
