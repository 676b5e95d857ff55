//! Google Maps platform adapters.
//!
//! - [`GoogleDistanceMatrixSource`] fills a [`DistanceMatrix`] from the
//!   Distance Matrix API.
//! - [`GoogleDirectionsSolver`] delegates stop ordering to the Directions
//!   API's waypoint optimisation.
//!
//! Both share a blocking [`GoogleClient`]; build one and hand it to each
//! adapter with `with_client` to reuse its connection pool and runtime.
//!
//! [`DistanceMatrix`]: roundtrip_core::DistanceMatrix

mod client;
mod config;
mod directions;
mod distance_matrix;
mod types;

pub use client::{ClientBuildError, GoogleClient};
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_ELEMENTS, DEFAULT_USER_AGENT, GoogleMapsConfig,
    ParseTravelModeError, TravelMode,
};
pub use directions::{GoogleDirectionsSolver, MAX_OPTIMISED_WAYPOINTS};
pub use distance_matrix::{GoogleDistanceMatrixSource, MAX_AXIS_ADDRESSES};
