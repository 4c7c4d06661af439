use crate::error::{QueryError, Result};
use crate::models::{Measurement, StationActivity};
use std::cmp::Ordering;
use std::collections::HashMap;

fn count_by_station(measurements: &[Measurement]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for measurement in measurements {
        *counts.entry(measurement.station_id.as_str()).or_default() += 1;
    }
    counts
}

/// Busiest first; equal counts fall back to ascending station id.
fn rank(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Observation count per station, most active first.
pub fn station_activity(measurements: &[Measurement]) -> Vec<StationActivity> {
    let mut counts: Vec<(&str, usize)> = count_by_station(measurements).into_iter().collect();
    counts.sort_by(|a, b| rank(*a, *b));

    counts
        .into_iter()
        .map(|(station_id, observations)| StationActivity {
            station_id: station_id.to_string(),
            observations,
        })
        .collect()
}

/// Station with the most measurements.
///
/// Ties go to the lexicographically smallest station id so repeated calls
/// on the same snapshot always agree.
pub fn most_active_station(measurements: &[Measurement]) -> Result<String> {
    count_by_station(measurements)
        .into_iter()
        .min_by(|a, b| rank(*a, *b))
        .map(|(station_id, _)| station_id.to_string())
        .ok_or(QueryError::EmptyDataset)
}
