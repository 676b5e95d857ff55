//! Mapping-provider adapters for roundtrip.
//!
//! Provides the HTTP-backed implementations of the core's
//! [`DistanceMatrixSource`](roundtrip_core::DistanceMatrixSource) and
//! [`RouteSolver`](roundtrip_core::RouteSolver) seams.

#![forbid(unsafe_code)]

pub mod google;

pub use google::{
    ClientBuildError, GoogleClient, GoogleDirectionsSolver, GoogleDistanceMatrixSource,
    GoogleMapsConfig, TravelMode,
};
