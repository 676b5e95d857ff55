//! Optimise command implementation for the roundtrip CLI.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roundtrip_core::{
    DistanceMatrixSource, RoutePlanner, RouteResult, RouteSolver, RouteStore, Waypoint,
};
use roundtrip_data::google::{
    GoogleClient, GoogleDirectionsSolver, GoogleDistanceMatrixSource, GoogleMapsConfig,
    TravelMode,
};
use roundtrip_solver_local::LocalSolver;
use serde::{Deserialize, Serialize};

use crate::code::{random_code, store_with_fresh_code};
use crate::stops::{load_stops_file, parse_home, parse_stop};
use crate::storage::open_store;
use crate::{
    ARG_API_KEY, ARG_HOME, ARG_MAPS_BASE_URL, ARG_STOP, ARG_STOPS_FILE, ARG_STORE_PATH,
    ARG_STRATEGY, ARG_TRAVEL_MODE, CliError, ENV_API_KEY, ENV_HOME,
};

/// How stops are ordered once the matrix is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Strategy {
    /// Exact search for small trips, nearest neighbour above that.
    #[default]
    Local,
    /// Let the Directions API optimise the waypoint order.
    Provider,
}

/// CLI arguments for the `optimise` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "optimise",
    long_about = "Fetch travel costs between home and every stop, order the \
                 stops into the cheapest round trip, store the result for 24 \
                 hours and print it with its share code. Options can come \
                 from CLI flags, configuration files, or environment \
                 variables.",
    about = "Order stops into a round trip from home"
)]
#[ortho_config(prefix = "ROUNDTRIP")]
pub(crate) struct OptimiseArgs {
    /// Home address; the trip starts and ends here.
    #[arg(long = ARG_HOME, value_name = "address")]
    #[serde(default)]
    pub(crate) home: Option<String>,
    /// A stop as `address` or `address|notes`. Repeat for each stop.
    #[arg(long = ARG_STOP, value_name = "address[|notes]")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) stops: Vec<String>,
    /// JSON file holding an array of `{"address", "notes"}` stops.
    #[arg(long = ARG_STOPS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) stops_file: Option<Utf8PathBuf>,
    /// Google Maps API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Override the Google Maps web service base URL.
    #[arg(long = ARG_MAPS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) maps_base_url: Option<String>,
    /// Travel mode: walking, driving, bicycling or transit.
    #[arg(long = ARG_TRAVEL_MODE, value_name = "mode")]
    #[serde(default)]
    pub(crate) travel_mode: Option<TravelMode>,
    /// Ordering strategy.
    #[arg(long = ARG_STRATEGY, value_enum)]
    #[serde(default)]
    pub(crate) strategy: Option<Strategy>,
    /// SQLite database holding shared routes; omit to keep them in memory.
    #[arg(long = ARG_STORE_PATH, value_name = "path")]
    #[serde(default)]
    pub(crate) store_path: Option<Utf8PathBuf>,
}

impl OptimiseArgs {
    pub(crate) fn into_config(self) -> Result<OptimiseConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimiseConfig::try_from(merged)
    }
}

/// Resolved `optimise` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct OptimiseConfig {
    pub(crate) home: Waypoint,
    pub(crate) stops: Vec<Waypoint>,
    pub(crate) stops_file: Option<Utf8PathBuf>,
    pub(crate) maps: GoogleMapsConfig,
    pub(crate) strategy: Strategy,
    pub(crate) store_path: Option<Utf8PathBuf>,
}

impl OptimiseConfig {
    /// Inline stops followed by any stops read from the stops file.
    pub(crate) fn load_stops(&self) -> Result<Vec<Waypoint>, CliError> {
        let mut stops = self.stops.clone();
        if let Some(path) = &self.stops_file {
            stops.extend(load_stops_file(path)?);
        }
        Ok(stops)
    }
}

impl TryFrom<OptimiseArgs> for OptimiseConfig {
    type Error = CliError;

    fn try_from(args: OptimiseArgs) -> Result<Self, Self::Error> {
        let home = args.home.ok_or(CliError::MissingArgument {
            field: ARG_HOME,
            env: ENV_HOME,
        })?;
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_API_KEY,
        })?;

        let home = parse_home(&home)?;
        let stops = args
            .stops
            .iter()
            .map(|stop| parse_stop(stop))
            .collect::<Result<Vec<_>, _>>()?;

        let mut maps = GoogleMapsConfig::new(api_key)
            .with_travel_mode(args.travel_mode.unwrap_or_default());
        if let Some(base_url) = args.maps_base_url {
            maps = maps.with_base_url(base_url);
        }

        Ok(Self {
            home,
            stops,
            stops_file: args.stops_file,
            maps,
            strategy: args.strategy.unwrap_or_default(),
            store_path: args.store_path,
        })
    }
}

/// Planner wired from trait objects so tests can swap either half.
pub(crate) type Planner = RoutePlanner<Box<dyn DistanceMatrixSource>, Box<dyn RouteSolver>>;

/// Builds the planner for the current optimise invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, config: &OptimiseConfig) -> Result<Planner, CliError>;
}

pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, config: &OptimiseConfig) -> Result<Planner, CliError> {
        let client =
            Arc::new(GoogleClient::new(config.maps.clone()).map_err(CliError::BuildMapsClient)?);
        let source: Box<dyn DistanceMatrixSource> =
            Box::new(GoogleDistanceMatrixSource::with_client(Arc::clone(&client)));
        let solver: Box<dyn RouteSolver> = match config.strategy {
            Strategy::Local => Box::new(LocalSolver::new()),
            Strategy::Provider => Box::new(GoogleDirectionsSolver::with_client(client)),
        };
        Ok(RoutePlanner::new(source, solver))
    }
}

/// JSON printed by `optimise`.
#[derive(Debug, Serialize)]
pub(crate) struct OptimiseOutput<'a> {
    pub(crate) route_code: &'a str,
    #[serde(flatten)]
    pub(crate) result: &'a RouteResult,
}

pub(crate) fn run_optimise(args: OptimiseArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimise_with(args, &DefaultPlannerBuilder, &mut stdout)
}

pub(crate) fn run_optimise_with(
    args: OptimiseArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = open_store(config.store_path.as_deref());
    optimise_into(&config, builder, store.as_ref(), writer)
}

pub(crate) fn optimise_into(
    config: &OptimiseConfig,
    builder: &dyn PlannerBuilder,
    store: &dyn RouteStore,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let stops = config.load_stops()?;
    let planner = builder.build(config)?;
    let result = planner.plan(config.home.clone(), stops)?;
    let stored = store_with_fresh_code(store, result, random_code)?;
    log::info!(
        "stored route {} in the {} store",
        stored.code(),
        store.kind()
    );

    let output = OptimiseOutput {
        route_code: stored.code().as_str(),
        result: stored.payload(),
    };
    write_json(writer, &output)
}

/// Pretty-print `value` followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<OptimiseConfig, CliError> {
    let merged = OptimiseArgs::merge_from_layers(layers).map_err(CliError::from)?;
    OptimiseConfig::try_from(merged)
}
