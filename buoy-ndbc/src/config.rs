use crate::error::{BuoyError, Result};
use crate::observation::FEET_PER_METRE;
use crate::record_parser::OffsetTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Historical standard meteorological archive, one gzip file per station-year.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://www.ndbc.noaa.gov/data/historical/stdmet/{station}h{year}.txt.gz";

/// Station page carrying the coordinates and title of a station.
pub const DEFAULT_STATION_PAGE_URL: &str =
    "https://www.ndbc.noaa.gov/station_page.php?station={station}";

/// Settings for fetching and normalizing archive data.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// URL with `{station}` and `{year}` placeholders
    pub archive_url: String,
    /// URL with a `{station}` placeholder
    pub station_page_url: String,
    /// Year fetches in flight at once
    pub fetch_concurrency: usize,
    pub request_timeout_secs: u64,
    /// Upper bound for the whole station page lookup
    pub lookup_timeout_secs: u64,
    pub user_agent: String,
    /// Multiplier from archive wave height units to feet
    pub wave_height_factor: f64,
    pub offsets: OffsetTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            station_page_url: DEFAULT_STATION_PAGE_URL.to_string(),
            fetch_concurrency: 4,
            request_timeout_secs: 60,
            lookup_timeout_secs: 30,
            user_agent: concat!("buoy-ndbc/", env!("CARGO_PKG_VERSION")).to_string(),
            wave_height_factor: FEET_PER_METRE,
            offsets: OffsetTable::default(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<PipelineConfig> {
        let contents = std::fs::read_to_string(path)?;
        PipelineConfig::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<PipelineConfig> {
        let config: PipelineConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.archive_url.contains("{station}") || !self.archive_url.contains("{year}") {
            return Err(BuoyError::InvalidConfig(
                "archive_url must contain {station} and {year}".to_string(),
            ));
        }
        if !self.station_page_url.contains("{station}") {
            return Err(BuoyError::InvalidConfig(
                "station_page_url must contain {station}".to_string(),
            ));
        }
        if self.fetch_concurrency == 0 {
            return Err(BuoyError::InvalidConfig(
                "fetch_concurrency must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 || self.lookup_timeout_secs == 0 {
            return Err(BuoyError::InvalidConfig(
                "timeouts must be at least one second".to_string(),
            ));
        }
        if !self.wave_height_factor.is_finite() || self.wave_height_factor <= 0.0 {
            return Err(BuoyError::InvalidConfig(
                "wave_height_factor must be a positive number".to_string(),
            ));
        }
        self.offsets.validate()
    }

    /// Archive files are published under lower-case station identifiers.
    pub fn archive_url_for(&self, station_id: &str, year: i32) -> String {
        self.archive_url
            .replace("{station}", &station_id.trim().to_lowercase())
            .replace("{year}", &year.to_string())
    }

    pub fn station_page_url_for(&self, station_id: &str) -> String {
        self.station_page_url
            .replace("{station}", &station_id.trim().to_lowercase())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_concurrency, 4);
    }

    #[test]
    fn test_archive_url_for_station_year() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.archive_url_for("44017", 2019),
            "https://www.ndbc.noaa.gov/data/historical/stdmet/44017h2019.txt.gz"
        );
        assert_eq!(
            config.station_page_url_for(" BZBM3 "),
            "https://www.ndbc.noaa.gov/station_page.php?station=bzbm3"
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(r#"{ "fetch_concurrency": 2 }"#).unwrap();
        assert_eq!(config.fetch_concurrency, 2);
        assert_eq!(config.lookup_timeout_secs, 30);
        assert_eq!(config.offsets.0.len(), 2);
    }

    #[test]
    fn test_json_offsets_override() {
        let json = r#"{
            "offsets": [
                {
                    "name": "custom",
                    "first_year": 2000,
                    "last_year": null,
                    "fields": {
                        "year": { "start": 0, "end": 4 },
                        "month": { "start": 5, "end": 7 },
                        "day": { "start": 8, "end": 10 },
                        "wave_height": { "start": 31, "end": 36 },
                        "dominant_period": { "start": 37, "end": 42 },
                        "direction": { "start": 49, "end": 52 }
                    }
                }
            ]
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.offsets.0.len(), 1);
        assert_eq!(config.offsets.era_for_year(2001).unwrap().name, "custom");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(PipelineConfig::from_json_str(r#"{ "fetch_concurrency": 0 }"#).is_err());
        assert!(PipelineConfig::from_json_str(r#"{ "archive_url": "https://example.com" }"#).is_err());
        assert!(PipelineConfig::from_json_str("not json").is_err());
    }
}
