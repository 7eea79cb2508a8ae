use crate::dataset::error::DatasetError;
use crate::range::RangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateApiError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Range(#[from] RangeError),
}
