//! HTTP surface: route registration, JSON shaping and error mapping.
//!
//! Grouped under `/api/v1.0`. Range-validation failures come back as 400
//! with an `{"error": ...}` body; an empty dataset as 404; data-source
//! failures as 500 with a generic body and a logged cause.

use crate::aggregate::Aggregator;
use crate::config::ServerConfig;
use crate::dataset::error::DatasetError;
use crate::dataset::store::{ClimateStore, TemperatureObservation};
use crate::error::ClimateApiError;
use crate::range::RangeResolver;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct AppState {
    store: ClimateStore,
    default_station: String,
}

impl AppState {
    pub fn new(store: ClimateStore, default_station: String) -> Self {
        Self {
            store,
            default_station,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temp_stats_open_ended))
        .route("/api/v1.0/{start}/{end}", get(temp_stats_closed))
        .with_state(state)
}

/// Binds the listener and serves the API until the process is stopped.
pub async fn serve(store: ClimateStore, config: &ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(store, config.default_station.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

/// Error wrapper carrying the HTTP mapping.
struct ApiError(ClimateApiError);

impl<E: Into<ClimateApiError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ClimateApiError::Range(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ClimateApiError::Dataset(DatasetError::NoDataAvailable) => (
                StatusCode::NOT_FOUND,
                "no observations available in the dataset".to_string(),
            ),
            ClimateApiError::Dataset(e) => {
                error!("dataset query failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to query the dataset".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

async fn index() -> Html<&'static str> {
    Html(
        "<h1>Hawaii Climate API</h1>\
         <p>Available routes:</p>\
         <ul>\
         <li>/api/v1.0/precipitation</li>\
         <li>/api/v1.0/stations</li>\
         <li>/api/v1.0/tobs</li>\
         <li>/api/v1.0/&lt;start&gt;</li>\
         <li>/api/v1.0/&lt;start&gt;/&lt;end&gt;</li>\
         </ul>",
    )
}

async fn precipitation(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<NaiveDate, Option<f64>>>, ApiError> {
    let series = Aggregator::new(&state.store).precipitation_series().await?;
    Ok(Json(series))
}

async fn stations(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let list = Aggregator::new(&state.store).station_list().await?;
    Ok(Json(list))
}

#[derive(Deserialize)]
struct TobsParams {
    station: Option<String>,
}

async fn tobs(
    State(state): State<AppState>,
    Query(params): Query<TobsParams>,
) -> Result<Json<Vec<TemperatureObservation>>, ApiError> {
    let station = params
        .station
        .as_deref()
        .unwrap_or(&state.default_station);
    let series = Aggregator::new(&state.store)
        .recent_temperature_series(station)
        .await?;
    Ok(Json(series))
}

/// The echoed tokens are the caller's raw input, not the resolved interval:
/// `end_date` stays `null` on the open-ended route even though the query ran
/// to the dataset's maximum date.
#[derive(Serialize)]
struct TempStatsBody {
    start_date: String,
    end_date: Option<String>,
    min_temp: Option<f64>,
    avg_temp: Option<f64>,
    max_temp: Option<f64>,
}

async fn temp_stats_open_ended(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<TempStatsBody>, ApiError> {
    temp_stats_body(&state, &start, None).await.map(Json)
}

async fn temp_stats_closed(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TempStatsBody>, ApiError> {
    temp_stats_body(&state, &start, Some(&end)).await.map(Json)
}

async fn temp_stats_body(
    state: &AppState,
    start: &str,
    end: Option<&str>,
) -> Result<TempStatsBody, ApiError> {
    let interval = RangeResolver::new(&state.store).resolve(start, end).await?;
    let stats = Aggregator::new(&state.store).temp_stats(interval).await?;
    Ok(TempStatsBody {
        start_date: start.to_string(),
        end_date: end.map(str::to_string),
        min_temp: stats.min,
        avg_temp: stats.avg,
        max_temp: stats.max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::DatasetLoader;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::fs;
    use tower::ServiceExt;

    const MEASUREMENTS: &str = "station,date,prcp,tobs\n\
         USC00519281,2016-08-23,0.7,70.0\n\
         USC00519281,2016-08-24,0.1,71.0\n\
         USC00513117,2017-01-01,0.2,10.0\n\
         USC00519281,2017-01-02,0.3,20.0\n\
         USC00513117,2017-01-03,,30.0\n\
         USC00519281,2017-08-23,0.0,81.0\n";

    const STATIONS: &str = "station\nUSC00519281\nUSC00513117\n";

    fn test_router(measurements_csv: &str) -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let measurements = dir.path().join("measurements.csv");
        let stations = dir.path().join("stations.csv");
        fs::write(&measurements, measurements_csv).unwrap();
        fs::write(&stations, STATIONS).unwrap();
        let store = DatasetLoader::new(&measurements, &stations).load().unwrap();
        let app = router(AppState::new(store, "USC00519281".to_string()));
        (dir, app)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn precipitation_is_an_object_keyed_by_date() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::OK);
        let object = json.as_object().unwrap();
        assert_eq!(object["2017-01-02"], 0.3);
        assert_eq!(object["2017-01-03"], Value::Null);
    }

    #[tokio::test]
    async fn stations_is_an_array_of_ids() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!(["USC00519281", "USC00513117"]));
    }

    #[tokio::test]
    async fn tobs_uses_the_default_station_and_window() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        // 2016-08-23 falls outside the 365-day window; 2017-01-01 and
        // 2017-01-03 belong to the other station.
        let dates: Vec<&str> = rows
            .iter()
            .map(|r| r["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2016-08-24", "2017-01-02", "2017-08-23"]);
        assert_eq!(rows[0]["tobs"], 71.0);
    }

    #[tokio::test]
    async fn tobs_station_can_be_overridden() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/tobs?station=USC00513117").await;
        assert_eq!(status, StatusCode::OK);
        let dates: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2017-01-01", "2017-01-03"]);
    }

    #[tokio::test]
    async fn open_ended_stats_echo_a_null_end_date() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/2017-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["start_date"], "2017-01-01");
        assert_eq!(json["end_date"], Value::Null);
        assert_eq!(json["min_temp"], 10.0);
        assert_eq!(json["avg_temp"], 35.25);
        assert_eq!(json["max_temp"], 81.0);
    }

    #[tokio::test]
    async fn closed_stats_echo_the_raw_tokens() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/2017-01-01/2017-01-03").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["start_date"], "2017-01-01");
        assert_eq!(json["end_date"], "2017-01-03");
        assert_eq!(json["min_temp"], 10.0);
        assert_eq!(json["avg_temp"], 20.0);
        assert_eq!(json["max_temp"], 30.0);
    }

    #[tokio::test]
    async fn end_beyond_dataset_max_is_a_400() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/2017-01-01/2017-08-24").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("2017-08-23"), "{message}");
    }

    #[tokio::test]
    async fn malformed_start_token_is_a_400() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/not-a-date").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("not-a-date"));
    }

    #[tokio::test]
    async fn start_past_the_dataset_yields_null_stats() {
        let (_dir, app) = test_router(MEASUREMENTS);
        let (status, json) = get_json(app, "/api/v1.0/2017-08-24").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["min_temp"], Value::Null);
        assert_eq!(json["avg_temp"], Value::Null);
        assert_eq!(json["max_temp"], Value::Null);
    }

    #[tokio::test]
    async fn empty_dataset_resolves_to_404() {
        let (_dir, app) = test_router("station,date,prcp,tobs\n");
        let (status, json) = get_json(app, "/api/v1.0/2017-01-01").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().is_some());
    }
}
