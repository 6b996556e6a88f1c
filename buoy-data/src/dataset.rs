//! Assembly of one station's observations across a range of years.

use buoy_ndbc::{
    config::PipelineConfig,
    error::{BuoyError, Result},
    observation::Observation,
    record_parser::{parse_blob, ParsedRecord},
    station::StationDescriptor,
    year_fetcher::{YearFetch, YearFetcher},
    year_range::YearRange,
};
use buoy_utils::{dates::format_date, geo::midpoint};
use futures::stream::{self, StreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Where a map of the dataset should be centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Deduplicated, converted and date-sorted observations for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDataset {
    pub station: StationDescriptor,
    pub observations: Vec<Observation>,
    /// Years whose archive resource could not be retrieved
    pub missing_years: BTreeSet<i32>,
    pub center: CenterPoint,
}

impl StationDataset {
    /// Fetch every year in `years`, parse what came back and assemble the dataset.
    ///
    /// Fetches run with at most `fetch_concurrency` in flight. Results are
    /// consumed in year order so "first seen" is stable whatever the timing.
    pub async fn build<F: YearFetcher>(
        station: StationDescriptor,
        years: YearRange,
        fetcher: &F,
        config: &PipelineConfig,
    ) -> Result<StationDataset> {
        let station_id = station.station_id.as_str();
        info!(
            "Fetching {} years ({}-{}) for station {}",
            years.len(),
            years.start(),
            years.end(),
            station_id
        );
        let fetches: Vec<YearFetch> = stream::iter(years)
            .map(|year| fetcher.fetch_year(station_id, year))
            .buffered(config.fetch_concurrency.max(1))
            .collect()
            .await;

        let mut accumulated: Vec<ParsedRecord> = Vec::new();
        let mut missing_years: BTreeSet<i32> = BTreeSet::new();
        for fetch in fetches {
            match fetch {
                YearFetch::Available(blob) => {
                    accumulated.extend(parse_blob(&blob, &config.offsets).records);
                }
                YearFetch::Unavailable { year, reason } => {
                    warn!("Missing data for year {} of {}: {}", year, station_id, reason);
                    missing_years.insert(year);
                }
            }
        }

        StationDataset::assemble(station, accumulated, missing_years, config.wave_height_factor)
    }

    /// Deduplicate by date (first occurrence wins), convert wave heights and
    /// sort ascending by date. An empty accumulation means there is no data.
    pub fn assemble(
        station: StationDescriptor,
        accumulated: Vec<ParsedRecord>,
        missing_years: BTreeSet<i32>,
        height_factor: f64,
    ) -> Result<StationDataset> {
        if accumulated.is_empty() {
            return Err(BuoyError::no_data(
                &station.station_id,
                "no usable records in any requested year",
            ));
        }
        let mut seen = HashSet::new();
        let mut observations: Vec<Observation> = accumulated
            .iter()
            .filter(|record| seen.insert(record.date))
            .map(|record| Observation::from_parsed(record, height_factor))
            .collect();
        observations.sort_by_key(|observation| observation.date);

        let (latitude, longitude) = midpoint(&[(station.latitude, station.longitude)])
            .unwrap_or((station.latitude, station.longitude));
        if let (Some(first), Some(last)) = (observations.first(), observations.last()) {
            info!(
                "Station {}: {} daily observations from {} to {}, {} missing years",
                station.station_id,
                observations.len(),
                format_date(&first.date),
                format_date(&last.date),
                missing_years.len()
            );
        }
        Ok(StationDataset {
            station,
            observations,
            missing_years,
            center: CenterPoint {
                latitude,
                longitude,
            },
        })
    }
}
