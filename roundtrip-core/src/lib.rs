//! Core domain types for the roundtrip route planner.
//!
//! The crate turns a pairwise distance matrix into a closed visiting order
//! that starts and ends at home, assembles that order into a shareable
//! [`RouteResult`], and keeps computed results in an expiring [`RouteStore`].
//!
//! Responsibilities:
//! - Define the consumed [`DistanceMatrixSource`] boundary and the
//!   [`RouteSolver`] strategy seam.
//! - Provide the pure route assembler and the [`RoutePlanner`] glue.
//! - Provide the time-to-live store abstraction with in-memory and SQLite
//!   backends.
//!
//! Boundaries:
//! - No geocoding, HTTP or CLI concerns live here; adapters for mapping
//!   providers belong in `roundtrip-data`.
//!
//! Invariants:
//! - Solvers and the assembler own no long-lived state.
//! - No global mutable state; stores are constructed once and injected.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod assemble;
mod clock;
mod error;
mod matrix;
mod order;
mod planner;
mod solver;
pub mod source;
pub mod store;
mod waypoint;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use assemble::{RouteResult, RouteStep, SHARE_URL_BASE, assemble, share_url};
pub use clock::{Clock, SystemClock};
pub use error::{ComputationError, InputError, RouteError, SolveError};
pub use matrix::{CostMetric, DistanceMatrix, LegCost, UNREACHABLE_COST};
pub use order::RouteOrder;
pub use planner::RoutePlanner;
pub use solver::{RouteSolver, SolveRequest};
pub use source::{DistanceMatrixSource, ProviderError};
pub use store::{
    BackendKind, MemoryRouteStore, ROUTE_CODE_LEN, ROUTE_TTL, RouteCode, RouteCodeError, RouteStore,
    SWEEP_BATCH_LIMIT, StorageError, StoredRoute, SweepReport, open_route_store, sweep_expired,
};
pub use waypoint::{HOME_NOTES, Waypoint};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteRouteStore;
