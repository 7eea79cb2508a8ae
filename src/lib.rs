//! Read-only JSON API over the Hawaii daily climate observation dataset.
//!
//! The dataset (per-station daily precipitation and temperature readings) is
//! served from local Parquet or CSV tables through a handful of aggregate
//! endpoints: a precipitation series, the station list, a trailing-window
//! temperature series for one station, and min/avg/max temperature stats
//! over a caller-supplied date range.

mod aggregate;
mod config;
mod dataset;
mod error;
mod range;
mod server;

pub use aggregate::Aggregator;
pub use config::{ServerConfig, DEFAULT_STATION};
pub use dataset::{ClimateStore, DatasetError, DatasetLoader, TempStats, TemperatureObservation};
pub use error::ClimateApiError;
pub use range::{resolve_with_bounds, DateInterval, RangeError, RangeResolver, DATE_FORMAT};
pub use server::{router, serve, AppState};
