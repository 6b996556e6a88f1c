use crate::error::{BuoyError, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

/// Embedded reference table of stations offered for direct selection.
pub static STATIONS_CSV: &str = include_str!("../../fixtures/stations.csv");

/// Represents an NDBC buoy station with the metadata needed to place it on a map.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StationDescriptor {
    /// NDBC station identifier (e.g., "44017" for Montauk Point)
    pub station_id: String,
    /// Human-readable station title
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// The static list of stations, parsed once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTable(Vec<StationDescriptor>);

impl StationTable {
    /// Parse the embedded reference table.
    pub fn load_default() -> Result<StationTable> {
        StationTable::parse_station_csv(STATIONS_CSV)
    }

    /// Parse a CSV string of station data into a table.
    ///
    /// Expected CSV columns: station_id, name, latitude, longitude
    pub fn parse_station_csv(csv_object: &str) -> Result<StationTable> {
        let mut station_list: Vec<StationDescriptor> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for (index, row) in rdr.records().enumerate() {
            let record = row?;
            // header is line 1
            let row_number = index + 2;
            let station_id = text_column(&record, 0, "station_id", row_number)?;
            let name = text_column(&record, 1, "name", row_number)?;
            let latitude = coordinate_column(&record, 2, "latitude", row_number)?;
            let longitude = coordinate_column(&record, 3, "longitude", row_number)?;
            station_list.push(StationDescriptor {
                station_id,
                name,
                latitude,
                longitude,
            });
        }
        Ok(StationTable(station_list))
    }

    /// Looks up a station by identifier. Returns `None` if not found.
    pub fn find(&self, station_id: &str) -> Option<&StationDescriptor> {
        let wanted = station_id.trim();
        self.0
            .iter()
            .find(|station| station.station_id.eq_ignore_ascii_case(wanted))
    }

    pub fn stations(&self) -> &[StationDescriptor] {
        &self.0
    }

    /// Identifier of the first station; the default selection.
    pub fn first_station_id(&self) -> Option<&str> {
        self.0.first().map(|station| station.station_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn text_column(record: &StringRecord, index: usize, column: &str, row: usize) -> Result<String> {
    match record.get(index).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(BuoyError::StationTable {
            row,
            message: format!("missing {column}"),
        }),
    }
}

fn coordinate_column(record: &StringRecord, index: usize, column: &str, row: usize) -> Result<f64> {
    let raw = text_column(record, index, column, row)?;
    raw.parse::<f64>().map_err(|_| BuoyError::StationTable {
        row,
        message: format!("{column} is not a number: {raw}"),
    })
}
