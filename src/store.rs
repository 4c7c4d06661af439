//! Read-only access to the loaded climate snapshot.

use crate::models::{Measurement, Station};

/// Read access to an immutable set of measurements and stations.
///
/// Both accessors return the full record set in load order on every call.
/// Callers impose their own ordering.
pub trait RecordStore: Send + Sync {
    fn measurements(&self) -> &[Measurement];

    fn stations(&self) -> &[Station];
}

/// In-memory snapshot built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    measurements: Vec<Measurement>,
    stations: Vec<Station>,
}

impl Dataset {
    pub fn new(measurements: Vec<Measurement>, stations: Vec<Station>) -> Self {
        Self {
            measurements,
            stations,
        }
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

impl RecordStore for Dataset {
    fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    fn stations(&self) -> &[Station] {
        &self.stations
    }
}
