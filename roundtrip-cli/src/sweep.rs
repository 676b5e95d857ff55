//! Sweep command: purge expired routes.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roundtrip_core::{RouteStore, SweepReport};
use serde::{Deserialize, Serialize};

use crate::optimise::write_json;
use crate::storage::open_store;
use crate::{ARG_STORE_PATH, CliError};

/// CLI arguments for the `sweep` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "sweep", about = "Delete expired routes from the store")]
#[ortho_config(prefix = "ROUNDTRIP")]
pub(crate) struct SweepArgs {
    /// SQLite database holding shared routes.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct SweepOutput {
    deleted: usize,
    errors: usize,
    batches: usize,
}

impl From<SweepReport> for SweepOutput {
    fn from(report: SweepReport) -> Self {
        Self {
            deleted: report.deleted,
            errors: report.errors,
            batches: report.batches,
        }
    }
}

pub(crate) fn run_sweep(args: SweepArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_sweep_with(args, &mut stdout)
}

pub(crate) fn run_sweep_with(args: SweepArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let store = open_store(merged.store_path.as_deref());
    sweep_into(store.as_ref(), writer)
}

pub(crate) fn sweep_into(store: &dyn RouteStore, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = store.sweep()?;
    if report.errors > 0 {
        log::warn!("{} expired routes could not be deleted", report.errors);
    }
    log::info!(
        "swept {} expired routes in {} batches",
        report.deleted,
        report.batches
    );
    write_json(writer, &SweepOutput::from(report))
}
