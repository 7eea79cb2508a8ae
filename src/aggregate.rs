//! Report shaping over the observation dataset.

use crate::dataset::store::{ClimateStore, TempStats, TemperatureObservation};
use crate::error::ClimateApiError;
use crate::range::DateInterval;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Number of days in the trailing observation window.
///
/// A literal 365-day offset, not a calendar-year subtraction: across a leap
/// year the two differ by a day, and the window boundary must not move.
const TRAILING_WINDOW_DAYS: i64 = 365;

/// Executes the read queries and packages their results.
///
/// Borrowing client over a [`ClimateStore`]; construct one per call site, it
/// holds no state of its own.
pub struct Aggregator<'a> {
    store: &'a ClimateStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a ClimateStore) -> Self {
        Self { store }
    }

    /// Full projection of every observation's precipitation keyed by date.
    ///
    /// When several observations share a date, the last row read wins; the
    /// map only fixes the presentation order of the keys.
    pub async fn precipitation_series(
        &self,
    ) -> Result<BTreeMap<NaiveDate, Option<f64>>, ClimateApiError> {
        let rows = self.store.all_precipitation_by_date().await?;
        let mut series = BTreeMap::new();
        for (date, precipitation) in rows {
            series.insert(date, precipitation);
        }
        Ok(series)
    }

    /// Station identifiers as stored, in source order.
    pub async fn station_list(&self) -> Result<Vec<String>, ClimateApiError> {
        Ok(self.store.all_station_ids().await?)
    }

    /// Temperature observations for `station_id` over the trailing
    /// 365-day window ending at the dataset's maximum date.
    pub async fn recent_temperature_series(
        &self,
        station_id: &str,
    ) -> Result<Vec<TemperatureObservation>, ClimateApiError> {
        let max_date = self.store.max_observation_date().await?;
        let window_start = max_date - Duration::days(TRAILING_WINDOW_DAYS);
        Ok(self
            .store
            .observations_for_station_since(station_id, window_start)
            .await?)
    }

    /// Min/avg/max temperature over a resolved interval, all stations.
    pub async fn temp_stats(&self, interval: DateInterval) -> Result<TempStats, ClimateApiError> {
        Ok(self
            .store
            .temperature_stats_in_range(interval.start, interval.end)
            .await?)
    }
}
