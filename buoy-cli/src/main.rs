//! Buoy CLI - Command line tool for historical NDBC buoy observations.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "buoy-cli",
    version,
    about = "Historical NDBC buoy data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: buoy_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    buoy_cmd::run(cli.command).await
}
