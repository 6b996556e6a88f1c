//! Query of historical observations for one station.

use crate::export::{export_records, OutputFormat};
use anyhow::Context;
use buoy_data::{
    filter::{FilterCriteria, InclusiveRange},
    pipeline::{run_request, StationReport},
    DatasetCache,
};
use buoy_ndbc::{
    config::PipelineConfig,
    station::StationTable,
    station_lookup::{SelectedResolver, StationResolver},
    year_fetcher::NdbcArchiveFetcher,
    year_range::{YearRange, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR},
};
use clap::Args;
use log::info;
use std::path::{Path, PathBuf};

/// Message shown when a request ends without a dataset.
pub const NO_DATA_MESSAGE: &str = "No historic data found.";

/// Range controls applied to the station's dataset.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    #[arg(long, default_value_t = 1)]
    pub month_min: u32,
    #[arg(long, default_value_t = 12)]
    pub month_max: u32,

    /// Wave height bounds in feet
    #[arg(long, default_value_t = 0.0)]
    pub height_min: f64,
    #[arg(long, default_value_t = 30.0)]
    pub height_max: f64,

    /// Dominant period bounds in seconds
    #[arg(long, default_value_t = 0.0)]
    pub period_min: f64,
    #[arg(long, default_value_t = 30.0)]
    pub period_max: f64,

    /// Direction bounds in degrees
    #[arg(long, default_value_t = 0)]
    pub direction_min: u16,
    #[arg(long, default_value_t = 360)]
    pub direction_max: u16,
}

impl FilterArgs {
    pub fn criteria(&self, years: YearRange) -> FilterCriteria {
        FilterCriteria {
            year: InclusiveRange::new(years.start(), years.end()),
            month: InclusiveRange::new(self.month_min, self.month_max),
            wave_height: InclusiveRange::new(self.height_min, self.height_max),
            period: InclusiveRange::new(self.period_min, self.period_max),
            direction: InclusiveRange::new(self.direction_min, self.direction_max),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Station from the reference table (defaults to its first entry)
    #[arg(short, long)]
    pub station: Option<String>,

    /// Any NDBC station identifier, looked up on its station page
    #[arg(long)]
    pub station_id: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FIRST_YEAR)]
    pub start_year: i32,
    #[arg(long, default_value_t = DEFAULT_LAST_YEAR)]
    pub end_year: i32,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// JSON file overriding pipeline settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the table here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

/// Load the configuration file when one is given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Run a query and write the filtered table.
///
/// A request that ends with no usable data prints [`NO_DATA_MESSAGE`] and
/// still succeeds.
pub async fn run_query(args: QueryArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let years = YearRange::new(args.start_year, args.end_year)?;
    let criteria = args.filters.criteria(years);

    let table = StationTable::load_default()?;
    let reference_id = match args.station.as_deref() {
        Some(station) => station.to_string(),
        None => table
            .first_station_id()
            .context("Station reference table is empty")?
            .to_string(),
    };
    let resolver =
        SelectedResolver::select(&table, &reference_id, args.station_id.as_deref(), &config);
    info!(
        "Querying station {} for {}-{}",
        resolver.station_id(),
        years.start(),
        years.end()
    );

    let fetcher = NdbcArchiveFetcher::new(&config)?;
    let cache = DatasetCache::new();
    let report = match run_request(&resolver, years, &criteria, &fetcher, &config, &cache).await {
        Ok(report) => report,
        Err(e) if e.is_no_data() => {
            info!("{}", e);
            println!("{}", NO_DATA_MESSAGE);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_summary(&report);
    export_records(&report.records, args.format, args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!(
            "Query complete. {} records written to {}",
            report.records.len(),
            path.display()
        );
    }
    Ok(())
}

/// Header and missing-years notice go to stderr so stdout stays a clean table.
fn print_summary(report: &StationReport) {
    eprintln!("Selected data for {}", report.display_name);
    if let Some(notice) = report.missing_years_notice() {
        eprintln!("{}", notice);
    }
}
