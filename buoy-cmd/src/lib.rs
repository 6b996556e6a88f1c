//! Command implementations for the buoy CLI.
//!
//! Provides subcommands for querying historical NDBC buoy observations
//! and listing the stations of the reference table.

use clap::Subcommand;

pub mod export;
pub mod query;
pub mod stations;

use export::OutputFormat;
use query::QueryArgs;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch, normalize and filter a station's historical observations
    Query(QueryArgs),

    /// List the stations of the reference table
    Stations {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Query(args) => query::run_query(args).await,
        Command::Stations { format } => stations::run_stations(format),
    }
}
