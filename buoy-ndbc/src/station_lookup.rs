//! Mapping a user's station selection to a [`StationDescriptor`].
//!
//! Two strategies exist: picking a station out of the embedded reference
//! table, or resolving a free-text identifier against the NDBC station page.
//! Both implement [`StationResolver`], so the dataset pipeline is written once.

use crate::error::{BuoyError, Result};
use crate::station::{StationDescriptor, StationTable};
use std::future::Future;

#[cfg(feature = "api")]
use crate::config::PipelineConfig;
#[cfg(feature = "api")]
use log::{debug, info};
#[cfg(feature = "api")]
use regex::Regex;
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use scraper::{Html, Selector};
#[cfg(feature = "api")]
use std::sync::OnceLock;

/// A way of turning a selection into station metadata.
pub trait StationResolver {
    /// Identifier used for archive requests and cache keys.
    fn station_id(&self) -> &str;

    /// Free text typed by the user, when that is what drives resolution.
    fn raw_input(&self) -> Option<&str> {
        None
    }

    fn resolve(&self) -> impl Future<Output = Result<StationDescriptor>> + Send;
}

/// Direct selection from the reference table.
#[derive(Debug, Clone)]
pub struct ReferenceTableResolver<'a> {
    table: &'a StationTable,
    station_id: String,
}

impl<'a> ReferenceTableResolver<'a> {
    pub fn new(table: &'a StationTable, station_id: &str) -> Self {
        ReferenceTableResolver {
            table,
            station_id: station_id.trim().to_string(),
        }
    }
}

impl StationResolver for ReferenceTableResolver<'_> {
    fn station_id(&self) -> &str {
        &self.station_id
    }

    async fn resolve(&self) -> Result<StationDescriptor> {
        self.table
            .find(&self.station_id)
            .cloned()
            .ok_or_else(|| BuoyError::StationNotFound(self.station_id.clone()))
    }
}

/// Values read off a station page.
#[derive(Debug, Clone, PartialEq)]
pub struct StationPage {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

/// A browsing session scoped to one lookup. Dropping it releases the
/// connection pool, whichever way the lookup ends.
#[cfg(feature = "api")]
pub struct PageSession {
    client: Client,
    station_id: String,
}

#[cfg(feature = "api")]
impl PageSession {
    pub fn open(station_id: &str, config: &PipelineConfig) -> Result<PageSession> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.lookup_timeout())
            .build()?;
        debug!("Opened station page session for {}", station_id);
        Ok(PageSession {
            client,
            station_id: station_id.to_string(),
        })
    }

    /// Load a page body; any failure means the station has no usable metadata.
    pub async fn load(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BuoyError::no_data(&self.station_id, format!("station page request failed: {}", e)))?;
        match response.status() {
            StatusCode::OK => response.text().await.map_err(|e| {
                BuoyError::no_data(&self.station_id, format!("failed to read station page: {}", e))
            }),
            StatusCode::NOT_FOUND => Err(BuoyError::no_data(&self.station_id, "station page not found")),
            status => Err(BuoyError::no_data(
                &self.station_id,
                format!("bad station page status: {}", status),
            )),
        }
    }
}

#[cfg(feature = "api")]
impl Drop for PageSession {
    fn drop(&mut self) {
        debug!("Released station page session for {}", self.station_id);
    }
}

/// Resolution of a free-text identifier through the station page.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct StationPageResolver {
    raw_input: String,
    station_id: String,
    config: PipelineConfig,
}

#[cfg(feature = "api")]
impl StationPageResolver {
    pub fn new(raw_input: &str, config: &PipelineConfig) -> Self {
        StationPageResolver {
            raw_input: raw_input.to_string(),
            station_id: raw_input.trim().to_string(),
            config: config.clone(),
        }
    }

    async fn lookup(&self) -> Result<StationDescriptor> {
        let url = self.config.station_page_url_for(&self.station_id);
        info!("Looking up station {} at {}", self.station_id, url);
        let session = PageSession::open(&self.station_id, &self.config)?;
        let html = session.load(&url).await?;
        let page = parse_station_page(&html).ok_or_else(|| {
            BuoyError::no_data(&self.station_id, "station page has no coordinates or title")
        })?;
        Ok(StationDescriptor {
            station_id: self.station_id.clone(),
            name: page.name,
            latitude: page.latitude,
            longitude: page.longitude,
        })
    }
}

#[cfg(feature = "api")]
impl StationResolver for StationPageResolver {
    fn station_id(&self) -> &str {
        &self.station_id
    }

    fn raw_input(&self) -> Option<&str> {
        Some(&self.raw_input)
    }

    async fn resolve(&self) -> Result<StationDescriptor> {
        let limit = self.config.lookup_timeout();
        match tokio::time::timeout(limit, self.lookup()).await {
            Ok(result) => result,
            Err(_) => Err(BuoyError::no_data(
                &self.station_id,
                format!("station page lookup timed out after {}s", limit.as_secs()),
            )),
        }
    }
}

/// The strategy picked for one request.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub enum SelectedResolver<'a> {
    Reference(ReferenceTableResolver<'a>),
    StationPage(StationPageResolver),
}

#[cfg(feature = "api")]
impl<'a> SelectedResolver<'a> {
    /// Non-blank free text wins over the reference table selection.
    pub fn select(
        table: &'a StationTable,
        reference_id: &str,
        free_text: Option<&str>,
        config: &PipelineConfig,
    ) -> SelectedResolver<'a> {
        match free_text.filter(|text| !text.trim().is_empty()) {
            Some(text) => SelectedResolver::StationPage(StationPageResolver::new(text, config)),
            None => SelectedResolver::Reference(ReferenceTableResolver::new(table, reference_id)),
        }
    }
}

#[cfg(feature = "api")]
impl StationResolver for SelectedResolver<'_> {
    fn station_id(&self) -> &str {
        match self {
            SelectedResolver::Reference(resolver) => resolver.station_id(),
            SelectedResolver::StationPage(resolver) => resolver.station_id(),
        }
    }

    fn raw_input(&self) -> Option<&str> {
        match self {
            SelectedResolver::Reference(resolver) => resolver.raw_input(),
            SelectedResolver::StationPage(resolver) => resolver.raw_input(),
        }
    }

    async fn resolve(&self) -> Result<StationDescriptor> {
        match self {
            SelectedResolver::Reference(resolver) => resolver.resolve().await,
            SelectedResolver::StationPage(resolver) => resolver.resolve().await,
        }
    }
}

/// Where the station title sits on the station page.
#[cfg(feature = "api")]
pub const TITLE_SELECTOR: &str = "body > div:nth-of-type(2) table td:nth-of-type(2) h1";

#[cfg(feature = "api")]
fn coordinate_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r#"currentstnlat\s*=\s*['"]?(-?\d+(?:\.\d+)?)"#,
            r#"currentstnlng\s*=\s*['"]?(-?\d+(?:\.\d+)?)"#,
        ]
        .map(|pattern| Regex::new(pattern).expect("station page pattern is valid"))
    })
}

/// Read coordinates from the page script and the title from the content
/// table's `<h1>`.
#[cfg(feature = "api")]
pub fn parse_station_page(html: &str) -> Option<StationPage> {
    let [latitude_pattern, longitude_pattern] = coordinate_patterns();
    let latitude = latitude_pattern.captures(html)?.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = longitude_pattern.captures(html)?.get(1)?.as_str().parse::<f64>().ok()?;

    let document = Html::parse_document(html);
    let selector = Selector::parse(TITLE_SELECTOR).ok()?;
    let title = document.select(&selector).next()?;
    let name = title
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        return None;
    }
    Some(StationPage {
        latitude,
        longitude,
        name,
    })
}
