//! Listing of the stations offered for direct selection.

use crate::export::{export_stations, OutputFormat};
use buoy_ndbc::station::StationTable;
use log::info;

pub fn run_stations(format: OutputFormat) -> anyhow::Result<()> {
    let table = StationTable::load_default()?;
    info!("{} stations in the reference table", table.len());
    export_stations(table.stations(), format)
}
