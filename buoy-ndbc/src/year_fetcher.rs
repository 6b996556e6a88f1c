//! Retrieval of one station-year of archive text.
//!
//! A year that cannot be fetched is an expected outcome, not an error: every
//! failure collapses into [`YearFetch::Unavailable`] and the caller decides
//! what a missing year means for the request. No retries are made.

use std::future::Future;

#[cfg(feature = "api")]
use crate::{config::PipelineConfig, error::Result};
#[cfg(feature = "api")]
use flate2::read::GzDecoder;
#[cfg(feature = "api")]
use log::debug;
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::io::Read;

/// Gzip member header.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unparsed text of one station-year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawYearBlob {
    pub station_id: String,
    pub year: i32,
    pub text: String,
}

impl RawYearBlob {
    pub fn new(station_id: impl Into<String>, year: i32, text: String) -> RawYearBlob {
        RawYearBlob {
            station_id: station_id.into(),
            year,
            text,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// True when the blob holds at least one non-blank line.
    pub fn has_content(&self) -> bool {
        self.text.lines().any(|line| !line.trim().is_empty())
    }
}

/// Outcome of fetching one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearFetch {
    Available(RawYearBlob),
    Unavailable { year: i32, reason: String },
}

impl YearFetch {
    /// Wrap fetched text, treating a blank resource as unavailable.
    pub fn from_text(station_id: &str, year: i32, text: String) -> YearFetch {
        let blob = RawYearBlob::new(station_id, year, text);
        if blob.has_content() {
            YearFetch::Available(blob)
        } else {
            YearFetch::Unavailable {
                year,
                reason: "empty resource".to_string(),
            }
        }
    }

    pub fn unavailable(year: i32, reason: impl Into<String>) -> YearFetch {
        YearFetch::Unavailable {
            year,
            reason: reason.into(),
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            YearFetch::Available(blob) => blob.year,
            YearFetch::Unavailable { year, .. } => *year,
        }
    }
}

/// Source of per-year archive text.
pub trait YearFetcher {
    fn fetch_year(&self, station_id: &str, year: i32) -> impl Future<Output = YearFetch> + Send;
}

/// Fetches gzip stdmet files from the NDBC historical archive.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct NdbcArchiveFetcher {
    client: Client,
    config: PipelineConfig,
}

#[cfg(feature = "api")]
impl NdbcArchiveFetcher {
    pub fn new(config: &PipelineConfig) -> Result<NdbcArchiveFetcher> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;
        Ok(NdbcArchiveFetcher {
            client,
            config: config.clone(),
        })
    }
}

#[cfg(feature = "api")]
impl YearFetcher for NdbcArchiveFetcher {
    async fn fetch_year(&self, station_id: &str, year: i32) -> YearFetch {
        let url = self.config.archive_url_for(station_id, year);
        debug!("GET {}", url);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return YearFetch::unavailable(year, format!("request failed: {}", e)),
        };
        if response.status() != StatusCode::OK {
            return YearFetch::unavailable(year, format!("bad response status: {}", response.status()));
        }
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return YearFetch::unavailable(year, format!("failed to read body: {}", e)),
        };
        match decode_body(&body) {
            Ok(text) => YearFetch::from_text(station_id, year, text),
            Err(reason) => YearFetch::unavailable(year, reason),
        }
    }
}

/// Gunzip the body when it carries the gzip header, otherwise take it as text.
#[cfg(feature = "api")]
pub fn decode_body(body: &[u8]) -> std::result::Result<String, String> {
    if body.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(body)
            .read_to_string(&mut text)
            .map_err(|e| format!("failed to decompress: {}", e))?;
        Ok(text)
    } else {
        String::from_utf8(body.to_vec()).map_err(|_| "response is not text".to_string())
    }
}
