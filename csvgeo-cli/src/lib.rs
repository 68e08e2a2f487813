//! Command-line interface for serving CSV sources as GeoJSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod get;
mod logging;

pub use error::CliError;

use get::GetArgs;

const ARG_SOURCE_ID: &str = "source-id";
const ARG_PROVIDER_CONFIG: &str = "provider-config";
const ENV_SOURCE_ID: &str = "CSVGEO_CMDS_GET_SOURCE_ID";
const ENV_PROVIDER_CONFIG: &str = "CSVGEO_CMDS_GET_PROVIDER_CONFIG";

/// Run the csvgeo CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init_logging();
    match cli.command {
        Command::Get(args) => get::run_get(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "csvgeo",
    about = "Serve CSV point data as GeoJSON feature collections",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a configured source and print its feature collection.
    Get(GetArgs),
}

#[cfg(test)]
mod tests;
