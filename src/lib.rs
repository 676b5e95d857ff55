//! Facade crate for the roundtrip route planner.
//!
//! This crate re-exports the core domain types and exposes the optional
//! solver, store and mapping-provider implementations behind feature flags.

#![forbid(unsafe_code)]

pub use roundtrip_core::{
    BackendKind, Clock, CostMetric, DistanceMatrix, DistanceMatrixSource, InputError, LegCost,
    MemoryRouteStore, ProviderError, ROUTE_CODE_LEN, ROUTE_TTL, RouteCode, RouteCodeError,
    RouteError, RouteOrder, RoutePlanner, RouteResult, RouteSolver, RouteStep, RouteStore,
    SolveError, SolveRequest, StorageError, StoredRoute, SweepReport, SystemClock, Waypoint,
    assemble, open_route_store, share_url,
};

#[cfg(feature = "store-sqlite")]
pub use roundtrip_core::SqliteRouteStore;

#[cfg(feature = "solver-local")]
pub use roundtrip_solver_local::{LocalSolver, LocalSolverConfig};

#[cfg(feature = "provider-google")]
pub use roundtrip_data::{
    GoogleClient, GoogleDirectionsSolver, GoogleDistanceMatrixSource, GoogleMapsConfig, TravelMode,
};
