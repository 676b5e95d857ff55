//! Error types emitted by the roundtrip CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roundtrip_core::{InputError, RouteCode, RouteCodeError, RouteError, StorageError};
use roundtrip_data::ClientBuildError;
use thiserror::Error;

/// Errors emitted by the roundtrip CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A home or stop value could not become a waypoint.
    #[error("invalid waypoint {value:?}: {source}")]
    InvalidWaypoint {
        /// Raw value as supplied.
        value: String,
        /// Validation failure.
        #[source]
        source: InputError,
    },
    /// Opening the stops file failed.
    #[error("failed to open stops file at {path:?}: {source}")]
    OpenStopsFile {
        /// File that could not be opened.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The stops file is not a JSON array of stops.
    #[error("failed to parse stops file at {path:?}: {source}")]
    ParseStopsFile {
        /// File that could not be decoded.
        path: Utf8PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Constructing the Google Maps client failed.
    #[error("failed to build Google Maps client: {0}")]
    BuildMapsClient(#[source] ClientBuildError),
    /// Planning the route failed.
    #[error("route planning failed: {0}")]
    Route(#[from] RouteError),
    /// The route store rejected a read or write.
    #[error("route store failed: {0}")]
    Storage(#[from] StorageError),
    /// A route code was malformed.
    #[error(transparent)]
    InvalidRouteCode(#[from] RouteCodeError),
    /// Every generated code collided with a live route.
    #[error("could not allocate an unused route code after {attempts} attempts")]
    CodesExhausted {
        /// Codes tried before giving up.
        attempts: usize,
    },
    /// No live route is stored under the code.
    #[error("route not found or expired: {code}")]
    RouteNotFound {
        /// Code that was looked up.
        code: RouteCode,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
