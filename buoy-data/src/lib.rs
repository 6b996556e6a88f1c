//! Dataset assembly, derived fields and filtering for buoy observations.
//!
//! This crate turns per-year archive fetches into one deduplicated,
//! date-sorted station dataset and narrows it down for display.

pub mod cache;
pub mod dataset;
pub mod derive;
pub mod filter;
pub mod pipeline;

#[cfg(test)]
mod testing;

pub use cache::{DatasetCache, DatasetKey};
pub use dataset::{CenterPoint, StationDataset};
pub use derive::{attach_derived_fields, cardinal, EnrichedDataset};
pub use filter::{FilterCriteria, InclusiveRange};
pub use pipeline::{run_request, run_uncached, StationReport};
