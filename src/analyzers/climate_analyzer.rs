use crate::analyzers::date_window::{latest_date, trailing_window, DateWindow};
use crate::analyzers::station_ranker::{most_active_station, station_activity};
use crate::error::Result;
use crate::models::{
    PrecipitationEntry, StationActivity, TemperatureObservation, TemperatureStats,
};
use crate::store::RecordStore;
use crate::utils::constants::DEFAULT_WINDOW_DAYS;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::debug;

/// Runs the read-only climate queries against a borrowed snapshot.
///
/// The analyzer holds a borrow for the lifetime of a single query and never
/// caches anything, so every call reflects the store it was built over.
pub struct ClimateAnalyzer<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    window_days: u32,
}

impl<'a, S: RecordStore + ?Sized> ClimateAnalyzer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn latest_date(&self) -> Result<NaiveDate> {
        latest_date(self.store.measurements())
    }

    /// Trailing window ending at the latest observed date.
    pub fn recent_window(&self) -> Result<DateWindow> {
        Ok(trailing_window(self.latest_date()?, self.window_days))
    }

    pub fn most_active_station(&self) -> Result<String> {
        most_active_station(self.store.measurements())
    }

    pub fn station_activity(&self) -> Vec<StationActivity> {
        station_activity(self.store.measurements())
    }

    /// Every measurement as `(date, precipitation)`, oldest first.
    ///
    /// Rows sharing a date keep their load order; missing readings stay null.
    pub fn precipitation_series(&self) -> Vec<PrecipitationEntry> {
        let mut series: Vec<PrecipitationEntry> = self
            .store
            .measurements()
            .iter()
            .map(|m| PrecipitationEntry {
                date: m.date,
                precipitation: m.precipitation,
            })
            .collect();

        series.sort_by_key(|entry| entry.date);
        series
    }

    /// Distinct station ids in first-seen order.
    pub fn station_roster(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.store
            .stations()
            .iter()
            .filter(|station| seen.insert(station.station_id.as_str()))
            .map(|station| station.station_id.clone())
            .collect()
    }

    /// Temperatures of the most active station over the trailing window,
    /// newest first.
    pub fn recent_year_temperatures(&self) -> Result<Vec<TemperatureObservation>> {
        let window = self.recent_window()?;
        let station_id = self.most_active_station()?;

        debug!(
            "Most active station {} over {} to {}",
            station_id, window.start, window.end
        );

        let mut observations: Vec<TemperatureObservation> = self
            .store
            .measurements()
            .iter()
            .filter(|m| m.station_id == station_id && window.contains(m.date))
            .map(|m| TemperatureObservation {
                date: m.date,
                temperature_observation: m.temperature_observation,
            })
            .collect();

        observations.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(observations)
    }

    /// Min, mean and max temperature for `start <= date` (and `date <= end`
    /// when given). `None` when no measurement falls in the range, including
    /// inverted ranges.
    pub fn temperature_stats(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Option<TemperatureStats> {
        let mut tmin = f64::INFINITY;
        let mut tmax = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for measurement in self.store.measurements() {
            if measurement.date < start || end.is_some_and(|end| measurement.date > end) {
                continue;
            }

            let t = measurement.temperature_observation;
            // Loaded snapshots are validated finite; hand-built stores may not be
            if !t.is_finite() {
                continue;
            }
            tmin = tmin.min(t);
            tmax = tmax.max(t);
            sum += t;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        // Rounding in the sum can push the mean a hair outside [tmin, tmax]
        let tavg = (sum / count as f64).max(tmin).min(tmax);

        Some(TemperatureStats { tmin, tavg, tmax })
    }
}
