//! Multi-dimensional range filter over enriched observation records.

use buoy_ndbc::{observation::ObservationRecord, year_range::YearRange};
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    pub fn new(min: T, max: T) -> Self {
        InclusiveRange { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// An absent value never falls inside a range.
    pub fn contains_opt(&self, value: Option<T>) -> bool {
        value.is_some_and(|value| self.contains(value))
    }
}

/// Per-query criteria; every dimension must match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub year: InclusiveRange<i32>,
    pub month: InclusiveRange<u32>,
    pub wave_height: InclusiveRange<f64>,
    pub period: InclusiveRange<f64>,
    pub direction: InclusiveRange<u16>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        let years = YearRange::default();
        FilterCriteria {
            year: InclusiveRange::new(years.start(), years.end()),
            month: InclusiveRange::new(1, 12),
            wave_height: InclusiveRange::new(0.0, 30.0),
            period: InclusiveRange::new(0.0, 30.0),
            direction: InclusiveRange::new(0, 360),
        }
    }
}

impl FilterCriteria {
    /// Full-window criteria with the year bounds taken from the requested range.
    pub fn for_years(years: YearRange) -> Self {
        FilterCriteria {
            year: InclusiveRange::new(years.start(), years.end()),
            ..FilterCriteria::default()
        }
    }

    pub fn matches(&self, record: &ObservationRecord) -> bool {
        self.year.contains(record.year)
            && self.month.contains(record.month)
            && self.wave_height.contains_opt(record.wave_height_ft)
            && self.period.contains_opt(record.dominant_period)
            && self.direction.contains(record.direction)
    }
}

/// The ordered subsequence of `records` that satisfies `criteria`.
pub fn apply(records: &[ObservationRecord], criteria: &FilterCriteria) -> Vec<ObservationRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}
