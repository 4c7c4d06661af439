use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_finite;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[serde(rename = "station")]
    #[validate(length(min = 1))]
    pub station_id: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0), custom(function = "validate_finite"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0), custom(function = "validate_finite"))]
    pub longitude: f64,

    #[validate(custom(function = "validate_finite"))]
    pub elevation: f64,
}

impl Station {
    pub fn new(
        station_id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            name: name.into(),
            latitude,
            longitude,
            elevation,
        }
    }
}
