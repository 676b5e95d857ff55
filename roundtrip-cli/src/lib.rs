//! Command-line interface for planning, sharing and expiring round trips.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod code;
mod error;
mod optimise;
mod show;
mod stops;
mod storage;
mod sweep;

pub use error::CliError;

use optimise::{OptimiseArgs, run_optimise};
use show::{ShowArgs, run_show};
use sweep::{SweepArgs, run_sweep};

pub(crate) const ARG_HOME: &str = "home";
pub(crate) const ARG_STOP: &str = "stop";
pub(crate) const ARG_STOPS_FILE: &str = "stops-file";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_MAPS_BASE_URL: &str = "maps-base-url";
pub(crate) const ARG_TRAVEL_MODE: &str = "travel-mode";
pub(crate) const ARG_STRATEGY: &str = "strategy";
pub(crate) const ARG_STORE_PATH: &str = "store-path";
pub(crate) const ARG_ROUTE_CODE: &str = "code";
pub(crate) const ENV_HOME: &str = "ROUNDTRIP_CMDS_OPTIMISE_HOME";
pub(crate) const ENV_API_KEY: &str = "ROUNDTRIP_CMDS_OPTIMISE_API_KEY";
pub(crate) const ENV_ROUTE_CODE: &str = "ROUNDTRIP_CMDS_SHOW_CODE";

/// Run the roundtrip CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure; nothing is retried
/// apart from route code allocation.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimise(args) => run_optimise(args),
        Command::Show(args) => run_show(args),
        Command::Sweep(args) => run_sweep(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roundtrip",
    about = "Order errands into a round trip from home and share the result",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order stops into the shortest round trip and store the result.
    Optimise(OptimiseArgs),
    /// Print a stored route by its share code.
    Show(ShowArgs),
    /// Delete expired routes from the store.
    Sweep(SweepArgs),
}

#[cfg(test)]
mod tests;
