//! Show command: look a shared route up by its code.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roundtrip_core::{RouteCode, RouteResult, RouteStore, StoredRoute};
use serde::{Deserialize, Serialize};

use crate::optimise::write_json;
use crate::storage::open_store;
use crate::{ARG_ROUTE_CODE, ARG_STORE_PATH, CliError, ENV_ROUTE_CODE};

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "show",
    about = "Print a stored route by its share code",
    long_about = "Print the route stored under a share code. Routes expire \
                 24 hours after they were computed; expired or unknown codes \
                 are reported as not found."
)]
#[ortho_config(prefix = "ROUNDTRIP")]
pub(crate) struct ShowArgs {
    /// Eight character share code printed by `optimise`.
    #[arg(value_name = ARG_ROUTE_CODE)]
    #[serde(default)]
    pub(crate) code: Option<String>,
    /// SQLite database holding shared routes.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
    /// Include creation and expiry timestamps (Unix milliseconds).
    #[arg(long)]
    #[serde(default)]
    pub(crate) verbose: bool,
}

/// Resolved `show` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct ShowConfig {
    pub(crate) code: RouteCode,
    pub(crate) store_path: Option<Utf8PathBuf>,
    pub(crate) verbose: bool,
}

impl TryFrom<ShowArgs> for ShowConfig {
    type Error = CliError;

    fn try_from(args: ShowArgs) -> Result<Self, Self::Error> {
        let raw = args.code.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_CODE,
            env: ENV_ROUTE_CODE,
        })?;
        Ok(Self {
            code: RouteCode::parse(&raw)?,
            store_path: args.store_path,
            verbose: args.verbose,
        })
    }
}

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    route_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<u64>,
    #[serde(flatten)]
    result: &'a RouteResult,
}

impl ShowArgs {
    pub(crate) fn into_config(self) -> Result<ShowConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShowConfig::try_from(merged)
    }
}

pub(crate) fn run_show(args: ShowArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_show_with(args, &mut stdout)
}

pub(crate) fn run_show_with(args: ShowArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = open_store(config.store_path.as_deref());
    show_into(&config, store.as_ref(), writer)
}

pub(crate) fn show_into(
    config: &ShowConfig,
    store: &dyn RouteStore,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let stored = store
        .get_record(&config.code)?
        .ok_or_else(|| CliError::RouteNotFound {
            code: config.code.clone(),
        })?;
    write_json(writer, &output_for(&stored, config.verbose))
}

fn output_for(stored: &StoredRoute, verbose: bool) -> ShowOutput<'_> {
    ShowOutput {
        route_code: stored.code().as_str(),
        created_at: verbose.then(|| unix_millis(stored.created_at())),
        expires_at: verbose.then(|| unix_millis(stored.expires_at())),
        result: stored.payload(),
    }
}

/// Milliseconds since the Unix epoch, clamped to the `u64` range.
pub(crate) fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
