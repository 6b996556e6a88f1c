//! One request end to end: resolve, fetch, derive, filter.

use crate::{
    cache::{DatasetCache, DatasetKey},
    dataset::{CenterPoint, StationDataset},
    derive::{attach_derived_fields, EnrichedDataset},
    filter::{apply, FilterCriteria},
};
use buoy_ndbc::{
    config::PipelineConfig, error::Result, observation::ObservationRecord,
    station::StationDescriptor, station_lookup::StationResolver, year_fetcher::YearFetcher,
    year_range::YearRange,
};
use buoy_utils::dates::join_years;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a consumer needs to render one completed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub station: StationDescriptor,
    pub display_name: String,
    pub center: CenterPoint,
    /// Filtered records, ascending by date
    pub records: Vec<ObservationRecord>,
    pub missing_years: BTreeSet<i32>,
}

impl StationReport {
    fn from_dataset(dataset: &EnrichedDataset, criteria: &FilterCriteria) -> StationReport {
        StationReport {
            station: dataset.station.clone(),
            display_name: dataset.station.name.clone(),
            center: dataset.center,
            records: apply(&dataset.records, criteria),
            missing_years: dataset.missing_years.clone(),
        }
    }

    /// "Missing data for year(s): 2015, 2017", or `None` when every year came back.
    pub fn missing_years_notice(&self) -> Option<String> {
        if self.missing_years.is_empty() {
            return None;
        }
        let years: Vec<i32> = self.missing_years.iter().copied().collect();
        Some(format!("Missing data for year(s): {}", join_years(&years)))
    }
}

/// Resolve the station, then build (or reuse) its dataset and filter it.
///
/// Resolution runs before any archive request, so a failed station page
/// lookup never costs a year fetch.
pub async fn run_request<R, F>(
    resolver: &R,
    years: YearRange,
    criteria: &FilterCriteria,
    fetcher: &F,
    config: &PipelineConfig,
    cache: &DatasetCache,
) -> Result<StationReport>
where
    R: StationResolver,
    F: YearFetcher,
{
    let key = DatasetKey::new(resolver.station_id(), years, resolver.raw_input());
    let dataset = match cache.get(&key) {
        Some(dataset) => {
            info!("Using cached dataset for station {}", key.station_id);
            dataset
        }
        None => {
            let station = resolver.resolve().await?;
            let dataset = StationDataset::build(station, years, fetcher, config).await?;
            cache.insert(key, attach_derived_fields(&dataset))
        }
    };
    let report = StationReport::from_dataset(&dataset, criteria);
    info!(
        "Selected {} of {} records for {}",
        report.records.len(),
        dataset.records.len(),
        report.display_name
    );
    Ok(report)
}

/// Same as [`run_request`] without a session cache.
pub async fn run_uncached<R, F>(
    resolver: &R,
    years: YearRange,
    criteria: &FilterCriteria,
    fetcher: &F,
    config: &PipelineConfig,
) -> Result<StationReport>
where
    R: StationResolver,
    F: YearFetcher,
{
    let cache = DatasetCache::new();
    run_request(resolver, years, criteria, fetcher, config, &cache).await
}
