//! Read-only query interface over the observation dataset.
//!
//! All queries run against lazy scans of the measurement and station tables;
//! every call re-executes against the underlying files, so the dataset's
//! bounds are recomputed per request and never cached. Collects are blocking
//! Polars work and run on the blocking thread pool.

use crate::dataset::error::DatasetError;
use chrono::NaiveDate;
use polars::prelude::{col, lit, DataFrame, DataType, LazyFrame};
use serde::Serialize;
use tokio::task;

pub(crate) const COL_STATION: &str = "station";
pub(crate) const COL_DATE: &str = "date";
pub(crate) const COL_PRCP: &str = "prcp";
pub(crate) const COL_TOBS: &str = "tobs";

/// One dated temperature reading for a station.
///
/// The reading is optional: a measurement row may carry precipitation but no
/// temperature, and such rows pass through as `null` rather than being
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureObservation {
    pub date: NaiveDate,
    #[serde(rename = "tobs")]
    pub temperature: Option<f64>,
}

/// Minimum, arithmetic mean and maximum of the temperature field over some
/// selection. All three are `None` when the selection holds no readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TempStats {
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

/// Handle over the two dataset tables.
///
/// Cloning is cheap (lazy frames share their scan plan), and every query
/// clones the plan for itself, so concurrent requests never share mutable
/// state.
#[derive(Clone)]
pub struct ClimateStore {
    measurements: LazyFrame,
    stations: LazyFrame,
}

impl ClimateStore {
    pub fn new(measurements: LazyFrame, stations: LazyFrame) -> Self {
        Self {
            measurements,
            stations,
        }
    }

    /// The maximum date present across all observations.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NoDataAvailable`] when the measurement table
    /// holds no rows.
    pub async fn max_observation_date(&self) -> Result<NaiveDate, DatasetError> {
        let frame = self.measurements.clone();
        let df = Self::collect(frame.select([col(COL_DATE).cast(DataType::Date).max()])).await?;
        let days = df
            .column(COL_DATE)?
            .date()?
            .get(0)
            .ok_or(DatasetError::NoDataAvailable)?;
        date_from_days(days)
    }

    /// Every observation's `(date, precipitation)` pair, in source row order,
    /// with no filtering or deduplication.
    pub async fn all_precipitation_by_date(
        &self,
    ) -> Result<Vec<(NaiveDate, Option<f64>)>, DatasetError> {
        let frame = self.measurements.clone();
        let df = Self::collect(frame.select([
            col(COL_DATE).cast(DataType::Date),
            col(COL_PRCP).cast(DataType::Float64),
        ]))
        .await?;

        let dates = df.column(COL_DATE)?.date()?;
        let prcp = df.column(COL_PRCP)?.f64()?;
        let mut rows = Vec::with_capacity(df.height());
        for (days, value) in dates.into_iter().zip(prcp.into_iter()) {
            let days = days.ok_or(DatasetError::NullObservationDate)?;
            rows.push((date_from_days(days)?, value));
        }
        Ok(rows)
    }

    /// Station identifiers as stored, in source row order. The station table
    /// is passed through verbatim: no deduplication is applied.
    pub async fn all_station_ids(&self) -> Result<Vec<String>, DatasetError> {
        let frame = self.stations.clone();
        let df = Self::collect(frame.select([col(COL_STATION)])).await?;
        let ids = df.column(COL_STATION)?.str()?;
        Ok(ids
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }

    /// Observations for one station on or after `since`, in source yield
    /// order. No upper date bound is applied; nothing in the dataset can
    /// postdate its own maximum.
    pub async fn observations_for_station_since(
        &self,
        station_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<TemperatureObservation>, DatasetError> {
        let frame = self.measurements.clone();
        let station_id = station_id.to_string();
        let df = Self::collect(
            frame
                .filter(
                    col(COL_STATION)
                        .eq(lit(station_id))
                        .and(col(COL_DATE).cast(DataType::Date).gt_eq(lit(since))),
                )
                .select([
                    col(COL_DATE).cast(DataType::Date),
                    col(COL_TOBS).cast(DataType::Float64),
                ]),
        )
        .await?;

        let dates = df.column(COL_DATE)?.date()?;
        let temps = df.column(COL_TOBS)?.f64()?;
        let mut rows = Vec::with_capacity(df.height());
        for (days, temperature) in dates.into_iter().zip(temps.into_iter()) {
            let days = days.ok_or(DatasetError::NullObservationDate)?;
            rows.push(TemperatureObservation {
                date: date_from_days(days)?,
                temperature,
            });
        }
        Ok(rows)
    }

    /// Min/avg/max of the temperature field over `[start, end]`, inclusive on
    /// both ends, across all stations. Null readings are ignored; an empty
    /// selection yields all-`None` stats rather than an error.
    pub async fn temperature_stats_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TempStats, DatasetError> {
        let frame = self.measurements.clone();
        let df = Self::collect(
            frame
                .filter(
                    col(COL_DATE)
                        .cast(DataType::Date)
                        .gt_eq(lit(start))
                        .and(col(COL_DATE).cast(DataType::Date).lt_eq(lit(end))),
                )
                .select([
                    col(COL_TOBS).cast(DataType::Float64).min().alias("min"),
                    col(COL_TOBS).cast(DataType::Float64).mean().alias("avg"),
                    col(COL_TOBS).cast(DataType::Float64).max().alias("max"),
                ]),
        )
        .await?;

        Ok(TempStats {
            min: df.column("min")?.f64()?.get(0),
            avg: df.column("avg")?.f64()?.get(0),
            max: df.column("max")?.f64()?.get(0),
        })
    }

    /// Executes a lazy plan on the blocking pool.
    async fn collect(frame: LazyFrame) -> Result<DataFrame, DatasetError> {
        let df = task::spawn_blocking(move || frame.collect()).await??;
        Ok(df)
    }
}

/// Converts Polars' days-since-epoch date representation back to a
/// `NaiveDate` (the `719_163` offset shifts from 1970-01-01 to 0001-01-01).
fn date_from_days(days: i32) -> Result<NaiveDate, DatasetError> {
    NaiveDate::from_num_days_from_ce_opt(days + 719_163).ok_or(DatasetError::CorruptDate(days))
}
