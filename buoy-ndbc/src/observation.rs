use crate::record_parser::ParsedRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Feet per metre, applied to the archive's wave heights.
pub const FEET_PER_METRE: f64 = 3.281;

/// A single daily buoy observation after deduplication and unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// Mean wave direction in degrees, 0-359
    pub direction: u16,
    /// Dominant wave period in seconds
    pub dominant_period: Option<f64>,
    /// Significant wave height in feet
    pub wave_height_ft: Option<f64>,
}

impl Observation {
    /// Convert a parsed archive record, scaling its wave height by `height_factor`.
    pub fn from_parsed(record: &ParsedRecord, height_factor: f64) -> Observation {
        Observation {
            date: record.date,
            direction: record.direction,
            dominant_period: record.dominant_period,
            wave_height_ft: record.wave_height_m.map(|height| height * height_factor),
        }
    }
}

/// An observation with its display fields attached, as handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub direction: u16,
    pub dominant_period: Option<f64>,
    pub wave_height_ft: Option<f64>,
    /// One of the 16 compass points
    pub cardinal: String,
    pub station_name: String,
}

impl ObservationRecord {
    pub fn new(observation: &Observation, cardinal: &str, station_name: &str) -> ObservationRecord {
        ObservationRecord {
            date: observation.date,
            year: observation.date.year(),
            month: observation.date.month(),
            direction: observation.direction,
            dominant_period: observation.dominant_period,
            wave_height_ft: observation.wave_height_ft,
            cardinal: cardinal.to_string(),
            station_name: station_name.to_string(),
        }
    }
}
