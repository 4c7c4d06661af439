pub mod measurement;
pub mod results;
pub mod station;

pub use measurement::Measurement;
pub use results::{PrecipitationEntry, StationActivity, TemperatureObservation, TemperatureStats};
pub use station::Station;

use validator::ValidationError;

/// Rejects `NaN` and infinities, which `range` lets through.
pub(crate) fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite"))
    }
}
