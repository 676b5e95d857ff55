//! Test doubles and workspace helpers shared by the CLI tests.

use super::*;
use camino::Utf8PathBuf;
use roundtrip_core::DistanceMatrix;
use roundtrip_core::test_support::{FixedMatrixSource, symmetric_matrix};
use roundtrip_solver_local::LocalSolver;
use std::fs;
use tempfile::TempDir;

use crate::optimise::{OptimiseConfig, Planner, PlannerBuilder, run_optimise_with};
use crate::show::run_show_with;
use crate::sweep::run_sweep_with;

/// API key handed to every stubbed optimise run.
pub(super) const API_KEY: &str = "test-key";

/// Costs for home plus three stops where the cheapest tour is 0-1-2-3-0.
pub(super) fn three_stop_matrix() -> DistanceMatrix {
    symmetric_matrix(&[
        &[0],
        &[300, 0],
        &[900, 300, 0],
        &[300, 900, 300, 0],
    ])
}

/// Planner builder that serves a fixed matrix and solves locally.
#[derive(Debug, Clone)]
pub(super) struct StubPlannerBuilder {
    pub(super) matrix: DistanceMatrix,
}

impl PlannerBuilder for StubPlannerBuilder {
    fn build(&self, _config: &OptimiseConfig) -> Result<Planner, CliError> {
        Ok(Planner::new(
            Box::new(FixedMatrixSource::with_matrix(self.matrix.clone())),
            Box::new(LocalSolver::new()),
        ))
    }
}

/// Temporary directory holding the SQLite store and any input files.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn store_path(&self) -> Utf8PathBuf {
        self.root.join("routes.db")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }
}

/// Parse `argv` and run the selected command into `stdout`.
pub(super) fn run_cli(
    argv: &[String],
    builder: &dyn PlannerBuilder,
    stdout: &mut Vec<u8>,
) -> Result<(), CliError> {
    let cli = Cli::try_parse_from(argv).map_err(CliError::from)?;
    match cli.command {
        Command::Optimise(args) => run_optimise_with(args, builder, stdout),
        Command::Show(args) => run_show_with(args, stdout),
        Command::Sweep(args) => run_sweep_with(args, stdout),
    }
}
