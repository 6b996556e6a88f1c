//! In-memory fakes shared by the unit tests of this crate.

use buoy_ndbc::{
    error::{BuoyError, Result},
    station::StationDescriptor,
    year_fetcher::{YearFetch, YearFetcher},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a stdmet line in the post-2005 layout (with the minute column).
pub(crate) fn modern_line(
    date: (i32, u32, u32),
    hour: u32,
    wave_height: &str,
    period: &str,
    direction: &str,
) -> String {
    let (year, month, day) = date;
    format!(
        "{year:04} {month:02} {day:02} {hour:02} 00 999 99.0 99.0 {wave_height:>5} {period:>5}  6.07 {direction:>3} 9999.0 999.0   8.9 999.0 99.0 99.00"
    )
}

pub(crate) fn montauk() -> StationDescriptor {
    StationDescriptor {
        station_id: "44017".to_string(),
        name: "Station 44017 (LLNR 665) - MONTAUK POINT - 23 NM SSW of Montauk Point, NY"
            .to_string(),
        latitude: 40.693,
        longitude: -72.049,
    }
}

/// Serves canned year files; any year not inserted is unavailable.
#[derive(Default)]
pub(crate) struct InMemoryFetcher {
    years: HashMap<i32, String>,
    calls: AtomicUsize,
}

impl InMemoryFetcher {
    pub(crate) fn insert(&mut self, year: i32, lines: Vec<String>) {
        let header = "#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS  TIDE\n\
                      #yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi    ft";
        self.years
            .insert(year, format!("{}\n{}\n", header, lines.join("\n")));
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl YearFetcher for InMemoryFetcher {
    async fn fetch_year(&self, station_id: &str, year: i32) -> YearFetch {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.years.get(&year) {
            Some(text) => YearFetch::from_text(station_id, year, text.clone()),
            None => YearFetch::unavailable(year, "bad response status: 404 Not Found"),
        }
    }
}

/// Resolver that answers from a fixed descriptor, or fails like a dead station page.
pub(crate) struct FixedResolver {
    pub station_id: String,
    pub raw_input: Option<String>,
    pub station: Option<StationDescriptor>,
}

impl FixedResolver {
    pub(crate) fn found(station: StationDescriptor) -> Self {
        FixedResolver {
            station_id: station.station_id.clone(),
            raw_input: None,
            station: Some(station),
        }
    }

    pub(crate) fn missing_page(raw_input: &str) -> Self {
        FixedResolver {
            station_id: raw_input.trim().to_string(),
            raw_input: Some(raw_input.to_string()),
            station: None,
        }
    }
}

impl buoy_ndbc::station_lookup::StationResolver for FixedResolver {
    fn station_id(&self) -> &str {
        &self.station_id
    }

    fn raw_input(&self) -> Option<&str> {
        self.raw_input.as_deref()
    }

    async fn resolve(&self) -> Result<StationDescriptor> {
        self.station
            .clone()
            .ok_or_else(|| BuoyError::no_data(&self.station_id, "station page not found"))
    }
}
