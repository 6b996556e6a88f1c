//! Display fields attached to a finished dataset.

use crate::dataset::{CenterPoint, StationDataset};
use buoy_ndbc::{observation::ObservationRecord, station::StationDescriptor};
use std::collections::BTreeSet;

/// The 16 compass points, clockwise from north.
pub const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const SECTOR_DEGREES: f64 = 360.0 / 16.0;

/// Nearest compass point for a bearing in degrees.
pub fn cardinal(direction: u16) -> &'static str {
    let sector = (f64::from(direction) / SECTOR_DEGREES).round() as usize;
    COMPASS[sector % COMPASS.len()]
}

/// A dataset whose observations carry cardinal labels and the station name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDataset {
    pub station: StationDescriptor,
    pub records: Vec<ObservationRecord>,
    pub missing_years: BTreeSet<i32>,
    pub center: CenterPoint,
}

pub fn attach_derived_fields(dataset: &StationDataset) -> EnrichedDataset {
    let station_name = dataset.station.name.as_str();
    let records = dataset
        .observations
        .iter()
        .map(|observation| {
            ObservationRecord::new(observation, cardinal(observation.direction), station_name)
        })
        .collect();
    EnrichedDataset {
        station: dataset.station.clone(),
        records,
        missing_years: dataset.missing_years.clone(),
        center: dataset.center,
    }
}
