/// Error types for the buoy archive library
use thiserror::Error;

/// Main error type for buoy data operations
#[derive(Error, Debug)]
pub enum BuoyError {
    /// Terminal outcome for a request: nothing usable came back
    #[error("No historic data found for station {station_id}: {reason}")]
    NoDataAvailable { station_id: String, reason: String },

    /// Identifier is not part of the station reference table
    #[error("Station not found: {0}")]
    StationNotFound(String),

    /// Failed to parse the station reference table
    #[error("Failed to parse station table: {0}")]
    CsvParse(#[from] csv::Error),

    /// Station reference table row is missing a column or holds a bad value
    #[error("Invalid station table row {row}: {message}")]
    StationTable { row: usize, message: String },

    /// Year range is inverted
    #[error("Invalid year range: {start} to {end}")]
    InvalidYearRange { start: i32, end: i32 },

    /// Pipeline configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pipeline configuration file could not be deserialized
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be constructed
    #[cfg(feature = "api")]
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl BuoyError {
    /// Create a no-data error for a station
    pub fn no_data(station_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoDataAvailable {
            station_id: station_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true when the error is the terminal "no data found" state
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoDataAvailable { .. })
    }
}

/// Type alias for Results using BuoyError
pub type Result<T> = std::result::Result<T, BuoyError>;
