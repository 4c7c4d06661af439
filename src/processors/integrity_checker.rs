use crate::models::Measurement;
use crate::store::{Dataset, RecordStore};
use crate::utils::constants::DEFAULT_JUMP_THRESHOLD;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub total_measurements: usize,
    pub total_stations: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub missing_precipitation: usize,
    pub unknown_station_measurements: usize,
    pub duplicate_readings: usize,
    pub violations: Vec<IntegrityViolation>,
    pub station_statistics: HashMap<String, StationStatistics>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct IntegrityViolation {
    pub station_id: String,
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    DuplicateReading,
    UnknownStation,
    SuspiciousJump,
}

#[derive(Debug, Clone, Default)]
pub struct StationStatistics {
    pub total_records: usize,
    pub missing_precipitation: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

/// Summarizes a loaded snapshot. Findings are reported, never fixed or
/// rejected: queries run over the snapshot exactly as loaded.
pub struct IntegrityChecker {
    temperature_jump_threshold: f64,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            temperature_jump_threshold: DEFAULT_JUMP_THRESHOLD,
        }
    }

    pub fn with_jump_threshold(mut self, temperature_jump_threshold: f64) -> Self {
        self.temperature_jump_threshold = temperature_jump_threshold;
        self
    }

    pub fn check(&self, dataset: &Dataset) -> IntegrityReport {
        let measurements = dataset.measurements();
        let known_stations: HashSet<&str> = dataset
            .stations()
            .iter()
            .map(|s| s.station_id.as_str())
            .collect();

        let mut report = IntegrityReport {
            total_measurements: measurements.len(),
            total_stations: dataset.station_count(),
            date_range: date_range(measurements),
            missing_precipitation: measurements
                .par_iter()
                .filter(|m| !m.has_precipitation())
                .count(),
            unknown_station_measurements: 0,
            duplicate_readings: 0,
            violations: Vec::new(),
            station_statistics: HashMap::new(),
        };

        // One violation per unknown station id, counted across all its rows
        let mut orphans: Vec<&Measurement> = measurements
            .par_iter()
            .filter(|m| !known_stations.contains(m.station_id.as_str()))
            .collect();
        report.unknown_station_measurements = orphans.len();
        orphans.sort_by(|a, b| a.station_id.cmp(&b.station_id).then_with(|| a.date.cmp(&b.date)));
        orphans.dedup_by(|a, b| a.station_id == b.station_id);
        for orphan in orphans {
            report.violations.push(IntegrityViolation {
                station_id: orphan.station_id.clone(),
                date: orphan.date,
                violation_type: ViolationType::UnknownStation,
                details: "measurement references a station missing from the roster".to_string(),
            });
        }

        let mut station_records: HashMap<&str, Vec<&Measurement>> = HashMap::new();
        for measurement in measurements {
            station_records
                .entry(measurement.station_id.as_str())
                .or_default()
                .push(measurement);
        }

        for (station_id, mut records) in station_records {
            records.sort_by_key(|m| m.date);
            report
                .station_statistics
                .insert(station_id.to_string(), station_statistics(&records));
            self.check_time_series(station_id, &records, &mut report);
        }

        report
            .violations
            .sort_by(|a, b| a.station_id.cmp(&b.station_id).then_with(|| a.date.cmp(&b.date)));

        report
    }

    fn check_time_series(
        &self,
        station_id: &str,
        records: &[&Measurement],
        report: &mut IntegrityReport,
    ) {
        for window in records.windows(2) {
            let prev = window[0];
            let curr = window[1];

            if prev.date == curr.date {
                report.duplicate_readings += 1;
                report.violations.push(IntegrityViolation {
                    station_id: station_id.to_string(),
                    date: curr.date,
                    violation_type: ViolationType::DuplicateReading,
                    details: format!("more than one reading on {}", curr.date),
                });
                continue;
            }

            let jump = (curr.temperature_observation - prev.temperature_observation).abs();
            if jump > self.temperature_jump_threshold {
                report.violations.push(IntegrityViolation {
                    station_id: station_id.to_string(),
                    date: curr.date,
                    violation_type: ViolationType::SuspiciousJump,
                    details: format!(
                        "temperature jumped {:.1} from {} to {}",
                        jump, prev.date, curr.date
                    ),
                });
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Measurements: {}\n", report.total_measurements));
        summary.push_str(&format!("Stations: {}\n", report.total_stations));

        match report.date_range {
            Some((first, last)) => summary.push_str(&format!("Date Range: {} to {}\n", first, last)),
            None => summary.push_str("Date Range: no measurements\n"),
        }

        let missing_pct = if report.total_measurements == 0 {
            0.0
        } else {
            100.0 * report.missing_precipitation as f64 / report.total_measurements as f64
        };
        summary.push_str(&format!(
            "Missing Precipitation: {} ({:.1}%)\n",
            report.missing_precipitation, missing_pct
        ));
        summary.push_str(&format!(
            "Unknown Station Measurements: {}\n",
            report.unknown_station_measurements
        ));
        summary.push_str(&format!("Duplicate Readings: {}\n", report.duplicate_readings));

        let mut stations: Vec<(&String, &StationStatistics)> =
            report.station_statistics.iter().collect();
        stations.sort_by(|a, b| b.1.total_records.cmp(&a.1.total_records).then_with(|| a.0.cmp(b.0)));

        if !stations.is_empty() {
            summary.push_str("\nStation Activity:\n");
            for (station_id, stats) in stations {
                summary.push_str(&format!(
                    "  {}: {} readings ({} without precipitation)\n",
                    station_id, stats.total_records, stats.missing_precipitation
                ));
            }
        }

        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));
        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. Station {} on {}: {}\n",
                    i + 1,
                    violation.station_id,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn date_range(measurements: &[Measurement]) -> Option<(NaiveDate, NaiveDate)> {
    let first = measurements.iter().map(|m| m.date).min()?;
    let last = measurements.iter().map(|m| m.date).max()?;
    Some((first, last))
}

/// `records` must already be sorted by date.
fn station_statistics(records: &[&Measurement]) -> StationStatistics {
    let mut stats = StationStatistics {
        total_records: records.len(),
        first_date: records.first().map(|m| m.date),
        last_date: records.last().map(|m| m.date),
        ..Default::default()
    };

    for record in records {
        if !record.has_precipitation() {
            stats.missing_precipitation += 1;
        }
        let t = record.temperature_observation;
        stats.min_temp = Some(stats.min_temp.map_or(t, |m| m.min(t)));
        stats.max_temp = Some(stats.max_temp.map_or(t, |m| m.max(t)));
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 8, d).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                Measurement::new("S1", date(21), Some(0.0), 77.0),
                Measurement::new("S1", date(22), None, 78.0),
                Measurement::new("S1", date(22), Some(0.1), 79.0),
                Measurement::new("S1", date(23), Some(0.0), 20.0),
                Measurement::new("S9", date(23), None, 80.0),
                Measurement::new("S9", date(24), None, 81.0),
            ],
            vec![Station::new("S1", "First", 21.27, -157.82, 3.0)],
        )
    }

    #[test]
    fn test_integrity_report() {
        let report = IntegrityChecker::new().check(&dataset());

        assert_eq!(report.total_measurements, 6);
        assert_eq!(report.total_stations, 1);
        assert_eq!(report.date_range, Some((date(21), date(24))));
        assert_eq!(report.missing_precipitation, 3);
        assert_eq!(report.unknown_station_measurements, 2);
        assert_eq!(report.duplicate_readings, 1);
        assert!(!report.is_clean());

        let kinds: Vec<ViolationType> = report.violations.iter().map(|v| v.violation_type).collect();
        assert!(kinds.contains(&ViolationType::DuplicateReading));
        assert!(kinds.contains(&ViolationType::SuspiciousJump));
        assert_eq!(
            kinds
                .iter()
                .filter(|k| **k == ViolationType::UnknownStation)
                .count(),
            1
        );

        let s1 = &report.station_statistics["S1"];
        assert_eq!(s1.total_records, 4);
        assert_eq!(s1.missing_precipitation, 1);
        assert_eq!(s1.first_date, Some(date(21)));
        assert_eq!(s1.min_temp, Some(20.0));
        assert_eq!(s1.max_temp, Some(79.0));
    }

    #[test]
    fn test_jump_threshold() {
        let count_jumps = |checker: IntegrityChecker| {
            checker
                .check(&dataset())
                .violations
                .iter()
                .filter(|v| v.violation_type == ViolationType::SuspiciousJump)
                .count()
        };

        // S1 drops 59 degrees from the 22nd to the 23rd
        assert_eq!(count_jumps(IntegrityChecker::new()), 1);
        assert_eq!(count_jumps(IntegrityChecker::new().with_jump_threshold(60.0)), 0);
        assert_eq!(count_jumps(IntegrityChecker::new().with_jump_threshold(0.5)), 3);
    }

    #[test]
    fn test_empty_dataset_report() {
        let checker = IntegrityChecker::new();
        let report = checker.check(&Dataset::default());

        assert!(report.is_clean());
        assert!(report.date_range.is_none());
        assert!(checker
            .generate_summary(&report)
            .contains("Date Range: no measurements"));
    }
}
