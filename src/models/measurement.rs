use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_finite;

/// One daily reading at one station.
///
/// Field names on disk follow the historical snapshot columns
/// (`station`, `date`, `prcp`, `tobs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Measurement {
    #[serde(rename = "station")]
    #[validate(length(min = 1))]
    pub station_id: String,

    pub date: NaiveDate,

    /// Absent readings stay `None`; they are never coerced to zero.
    #[serde(rename = "prcp")]
    #[validate(range(min = 0.0), custom(function = "validate_finite"))]
    pub precipitation: Option<f64>,

    #[serde(rename = "tobs")]
    #[validate(custom(function = "validate_finite"))]
    pub temperature_observation: f64,
}

impl Measurement {
    pub fn new(
        station_id: impl Into<String>,
        date: NaiveDate,
        precipitation: Option<f64>,
        temperature_observation: f64,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            precipitation,
            temperature_observation,
        }
    }

    pub fn has_precipitation(&self) -> bool {
        self.precipitation.is_some()
    }
}
