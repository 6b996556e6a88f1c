//! Session cache of enriched datasets.

use crate::derive::EnrichedDataset;
use buoy_ndbc::year_range::YearRange;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identity of one dataset request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub station_id: String,
    pub years: YearRange,
    /// Free-text input for page-resolved stations, `None` for table selections
    pub raw_input: Option<String>,
}

impl DatasetKey {
    pub fn new(station_id: &str, years: YearRange, raw_input: Option<&str>) -> Self {
        DatasetKey {
            station_id: station_id.to_string(),
            years,
            raw_input: raw_input.map(str::to_string),
        }
    }
}

/// Datasets computed during the session. Selecting another station
/// discards everything cached for the previous one.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<DatasetKey, Arc<EnrichedDataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        DatasetCache::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DatasetKey, Arc<EnrichedDataset>>> {
        // a panic elsewhere cannot leave a half-written entry behind
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &DatasetKey) -> Option<Arc<EnrichedDataset>> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: DatasetKey, dataset: EnrichedDataset) -> Arc<EnrichedDataset> {
        let dataset = Arc::new(dataset);
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|cached, _| cached.station_id == key.station_id);
        if entries.len() < before {
            debug!(
                "Evicted {} cached datasets on switch to station {}",
                before - entries.len(),
                key.station_id
            );
        }
        entries.insert(key, Arc::clone(&dataset));
        dataset
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
