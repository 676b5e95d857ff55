//! Error taxonomy shared by solvers, the assembler and the planner.
//!
//! Solvers and the assembler return [`SolveError`]; the planner, which also
//! talks to a store, returns the wider [`RouteError`].

use thiserror::Error;

use crate::{ProviderError, StorageError};

/// The caller supplied something that cannot be routed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Only the home location was supplied.
    #[error("no waypoints to visit (only the home address was supplied)")]
    NoWaypoints,
    /// A waypoint address was empty after trimming.
    #[error("waypoint address must not be empty")]
    EmptyAddress,
    /// The home index does not address a matrix row.
    #[error("home index {home_index} is outside a matrix of size {size}")]
    HomeOutOfRange {
        /// Requested home index.
        home_index: usize,
        /// Number of points in the matrix.
        size: usize,
    },
    /// A matrix row had the wrong number of cells.
    #[error("distance matrix row {row} has {found} cells, expected {expected}")]
    MatrixNotSquare {
        /// Offending row.
        row: usize,
        /// Number of rows, and therefore required cells per row.
        expected: usize,
        /// Cells present in the row.
        found: usize,
    },
    /// The waypoint list and the matrix disagree on the number of points.
    #[error("{waypoints} waypoints were supplied for a matrix of size {size}")]
    WaypointCountMismatch {
        /// Number of waypoints supplied.
        waypoints: usize,
        /// Number of points in the matrix.
        size: usize,
    },
    /// The strategy needs addresses but the request carried none.
    #[error("this solver needs waypoint addresses alongside the matrix")]
    MissingAddresses,
    /// The strategy cannot order this many waypoints.
    #[error("{found} waypoints exceed the limit of {limit} for this solver")]
    TooManyWaypoints {
        /// Maximum waypoints accepted.
        limit: usize,
        /// Waypoints supplied.
        found: usize,
    },
}

/// An unexpected failure while solving or assembling a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route computation failed: {message}")]
pub struct ComputationError {
    message: String,
}

impl ComputationError {
    /// Wrap a descriptive message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`RouteSolver::solve`](crate::RouteSolver::solve) and
/// [`assemble`](crate::assemble).
///
/// Each call surfaces exactly one terminal error; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The request could not be routed.
    #[error(transparent)]
    Input(#[from] InputError),
    /// A delegated strategy's provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Solving or assembling hit an unexpected state.
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// Errors returned by [`RoutePlanner`](crate::RoutePlanner) and callers that
/// persist its results.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The request could not be routed.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The distance source or a delegated solver failed as a whole.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Solving or assembling hit an unexpected state.
    #[error(transparent)]
    Computation(#[from] ComputationError),
    /// The route store rejected a read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SolveError> for RouteError {
    fn from(error: SolveError) -> Self {
        match error {
            SolveError::Input(inner) => Self::Input(inner),
            SolveError::Provider(inner) => Self::Provider(inner),
            SolveError::Computation(inner) => Self::Computation(inner),
        }
    }
}
