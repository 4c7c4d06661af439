use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde_json::Value;

use crate::error::Result;
use crate::models::{PrecipitationEntry, TemperatureObservation, TemperatureStats};
use crate::server::AppState;
use crate::store::RecordStore;
use crate::utils::constants::{ROUTE_PRECIPITATION, ROUTE_STATIONS, ROUTE_TOBS};
use crate::utils::dates::parse_date_range;

/// List the available API routes.
pub async fn index() -> Html<String> {
    Html(format!(
        "Available Routes:<br/>\
         {ROUTE_PRECIPITATION}<br/>\
         {ROUTE_STATIONS}<br/>\
         {ROUTE_TOBS}<br/>\
         /api/v1.0/&lt;start&gt;<br/>\
         /api/v1.0/&lt;start&gt;/&lt;end&gt;<br/>"
    ))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "climate-query",
        "measurements": state.dataset.measurements().len(),
        "stations": state.dataset.stations().len(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn precipitation(State(state): State<AppState>) -> Result<Json<Vec<PrecipitationEntry>>> {
    let series = state
        .run_query(|analyzer| Ok(analyzer.precipitation_series()))
        .await?;
    Ok(Json(series))
}

pub async fn stations(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let roster = state
        .run_query(|analyzer| Ok(analyzer.station_roster()))
        .await?;
    Ok(Json(roster))
}

pub async fn tobs(State(state): State<AppState>) -> Result<Json<Vec<TemperatureObservation>>> {
    let rows = state
        .run_query(|analyzer| analyzer.recent_year_temperatures())
        .await?;
    Ok(Json(rows))
}

/// `/api/v1.0/{start}`: stats for every date from `start` on.
pub async fn stats_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>> {
    range_stats(state, &start, None).await
}

/// `/api/v1.0/{start}/{end}`: stats for `start..=end`.
pub async fn stats_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>> {
    range_stats(state, &start, Some(end.as_str())).await
}

/// Zero or one stats row; dates are validated before the snapshot is touched.
async fn range_stats(
    state: AppState,
    start: &str,
    end: Option<&str>,
) -> Result<Json<Vec<TemperatureStats>>> {
    let (start, end) = parse_date_range(start, end)?;

    let stats = state
        .run_query(move |analyzer| Ok(analyzer.temperature_stats(start, end)))
        .await?;

    Ok(Json(stats.into_iter().collect()))
}
