use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// A single `(date, precipitation)` row of the precipitation series.
///
/// Serializes as a one-key object mapping the ISO date to the reading,
/// e.g. `{"2017-08-23": 0.02}` or `{"2017-08-23": null}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationEntry {
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
}

impl Serialize for PrecipitationEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date.format("%Y-%m-%d").to_string(), &self.precipitation)?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct TemperatureObservation {
    pub date: NaiveDate,
    pub temperature_observation: f64,
}

/// Minimum, mean and maximum temperature over a filtered set of measurements.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct TemperatureStats {
    pub tmin: f64,
    pub tavg: f64,
    pub tmax: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct StationActivity {
    pub station_id: String,
    pub observations: usize,
}
