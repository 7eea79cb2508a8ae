use crate::dataset::error::DatasetError;
use crate::dataset::store::ClimateStore;
use log::info;
use polars::prelude::{LazyCsvReader, LazyFileListReader, LazyFrame};
use std::path::{Path, PathBuf};

/// Opens the measurement and station tables as Polars `LazyFrame`s.
///
/// Both tables may be stored as Parquet or headered CSV; the format is picked
/// by file extension. Nothing is read eagerly beyond the schema: queries run
/// against the lazy scans, so the files back every request without an
/// intermediate copy in memory.
pub struct DatasetLoader {
    measurements_path: PathBuf,
    stations_path: PathBuf,
}

impl DatasetLoader {
    pub fn new(measurements: &Path, stations: &Path) -> Self {
        Self {
            measurements_path: measurements.to_path_buf(),
            stations_path: stations.to_path_buf(),
        }
    }

    /// Scans both tables and wraps them in a [`ClimateStore`].
    pub fn load(&self) -> Result<ClimateStore, DatasetError> {
        let measurements = Self::scan_table(&self.measurements_path)?;
        let stations = Self::scan_table(&self.stations_path)?;
        info!(
            "opened dataset: measurements at {:?}, stations at {:?}",
            self.measurements_path, self.stations_path
        );
        Ok(ClimateStore::new(measurements, stations))
    }

    fn scan_table(path: &Path) -> Result<LazyFrame, DatasetError> {
        std::fs::metadata(path).map_err(|e| DatasetError::TableNotFound(path.to_path_buf(), e))?;

        let extension = path.extension().and_then(|e| e.to_str());
        match extension {
            Some("parquet") => LazyFrame::scan_parquet(path, Default::default())
                .map_err(|e| DatasetError::TableScan(path.to_path_buf(), e)),
            Some("csv") => LazyCsvReader::new(path)
                .with_has_header(true)
                .with_try_parse_dates(true)
                .finish()
                .map_err(|e| DatasetError::TableScan(path.to_path_buf(), e)),
            _ => Err(DatasetError::UnsupportedTableFormat(path.to_path_buf())),
        }
    }
}
