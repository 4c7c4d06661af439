use crate::error::{QueryError, Result};
use crate::models::Measurement;
use chrono::{Days, NaiveDate};

/// Inclusive `[start, end]` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Most recent date across all measurements.
pub fn latest_date(measurements: &[Measurement]) -> Result<NaiveDate> {
    measurements
        .iter()
        .map(|m| m.date)
        .max()
        .ok_or(QueryError::EmptyDataset)
}

/// Window of `days` calendar days ending at `end`, both bounds included.
///
/// Plain day subtraction: no leap-year adjustment beyond what the calendar
/// already gives. Saturates at the earliest representable date.
pub fn trailing_window(end: NaiveDate, days: u32) -> DateWindow {
    let start = end
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);

    DateWindow { start, end }
}
