//! Core types and NDBC archive access for historical buoy observations.
//!
//! Network access (archive fetcher, station page lookup) lives behind the
//! `api` feature; parsing and the station table are always available.

pub mod config;
pub mod error;
pub mod observation;
pub mod record_parser;
pub mod station;
pub mod station_lookup;
pub mod year_fetcher;
pub mod year_range;

pub use error::{BuoyError, Result};
