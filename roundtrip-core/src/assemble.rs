//! Route assembler: turns a visiting order into a presentable itinerary.
//!
//! Assembly is a pure function of the order, the waypoints and the matrix.
//! Totals are summed in metres and seconds and rounded once at the end.

use url::form_urlencoded::byte_serialize;

use crate::{
    ComputationError, DistanceMatrix, InputError, RouteOrder, SolveError, UNREACHABLE_COST,
    Waypoint,
};

/// Prefix of the shareable navigation link.
pub const SHARE_URL_BASE: &str = "https://www.google.com/maps/dir/";

const METRES_PER_KM: f64 = 1000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// One numbered entry in an assembled itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStep {
    /// Position along the route, starting at 1.
    pub step: u32,
    /// Address visited at this step.
    pub address: String,
    /// Notes carried over from the waypoint.
    pub notes: String,
    /// True for the departure and the return.
    pub is_home: bool,
}

/// The assembled artefact handed to presentation and storage.
///
/// Serialises as `{route, total_distance, total_duration, google_maps_url}`
/// with `unreachable_legs` present only when the route contains legs the
/// distance source could not resolve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    #[cfg_attr(feature = "serde", serde(rename = "route"))]
    steps: Vec<RouteStep>,
    #[cfg_attr(feature = "serde", serde(rename = "total_distance"))]
    total_distance_km: f64,
    #[cfg_attr(feature = "serde", serde(rename = "total_duration"))]
    total_duration_min: f64,
    #[cfg_attr(feature = "serde", serde(rename = "google_maps_url"))]
    share_url: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "is_zero")
    )]
    unreachable_legs: usize,
}

#[cfg(feature = "serde")]
fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl RouteResult {
    /// Itinerary in visiting order.
    #[must_use]
    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Total distance in kilometres, rounded to two decimals.
    #[must_use]
    pub const fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Total duration in minutes, rounded to one decimal.
    #[must_use]
    pub const fn total_duration_min(&self) -> f64 {
        self.total_duration_min
    }

    /// Navigation link covering every step.
    #[must_use]
    pub fn share_url(&self) -> &str {
        &self.share_url
    }

    /// Number of legs the distance source reported as unreachable.
    ///
    /// Each such leg carries [`UNREACHABLE_COST`] into both totals, so a
    /// non-zero count means the totals are not real travel figures.
    #[must_use]
    pub const fn unreachable_legs(&self) -> usize {
        self.unreachable_legs
    }

    /// Whether every leg of the route was reachable.
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        self.unreachable_legs == 0
    }
}

/// Build the shareable link for `addresses` in visiting order.
///
/// Each address is form-urlencoded so spaces, commas and slashes cannot
/// break the path.
///
/// # Examples
/// ```
/// use roundtrip_core::share_url;
///
/// let url = share_url(["1 Main St, Springfield", "Elm/Oak"]);
/// assert_eq!(
///     url,
///     "https://www.google.com/maps/dir/1+Main+St%2C+Springfield/Elm%2FOak"
/// );
/// ```
pub fn share_url<'a, I>(addresses: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let path = addresses
        .into_iter()
        .map(|address| byte_serialize(address.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/");
    format!("{SHARE_URL_BASE}{path}")
}

/// Assemble `order` into a numbered itinerary with totals and a share link.
///
/// `waypoints` and `matrix` must share indexing with the order.
///
/// # Errors
///
/// - [`InputError::WaypointCountMismatch`] when the waypoint list and the
///   matrix disagree in size.
/// - [`ComputationError`] when the order does not fit the waypoint list.
///
/// # Examples
/// ```
/// use roundtrip_core::{assemble, DistanceMatrix, LegCost, RouteOrder, Waypoint};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let waypoints = vec![Waypoint::home("Home")?, Waypoint::stop("Park", "")?];
/// let matrix = DistanceMatrix::from_fn(2, |from, to| {
///     Some(if from == to { LegCost::default() } else { LegCost::new(1500, 90) })
/// });
/// let order = RouteOrder::closed_tour(0, [1], 2)?;
///
/// let result = assemble(&order, &waypoints, &matrix)?;
/// assert_eq!(result.steps().len(), 3);
/// assert_eq!(result.total_distance_km(), 3.0);
/// assert_eq!(result.total_duration_min(), 3.0);
/// # Ok(())
/// # }
/// ```
pub fn assemble(
    order: &RouteOrder,
    waypoints: &[Waypoint],
    matrix: &DistanceMatrix,
) -> Result<RouteResult, SolveError> {
    if waypoints.len() != matrix.size() {
        return Err(InputError::WaypointCountMismatch {
            waypoints: waypoints.len(),
            size: matrix.size(),
        }
        .into());
    }
    if order.len() != waypoints.len() + 1 {
        return Err(ComputationError::new(format!(
            "route order of length {} does not match {} waypoints",
            order.len(),
            waypoints.len()
        ))
        .into());
    }

    let last = order.len().saturating_sub(1);
    let mut steps = Vec::with_capacity(order.len());
    for (position, &index) in order.indices().iter().enumerate() {
        let waypoint = waypoints.get(index).ok_or_else(|| {
            ComputationError::new(format!("route order references missing waypoint {index}"))
        })?;
        let step = u32::try_from(position + 1)
            .map_err(|_| ComputationError::new("route has too many steps to number"))?;
        steps.push(RouteStep {
            step,
            address: waypoint.address().to_owned(),
            notes: waypoint.notes().to_owned(),
            is_home: position == 0 || position == last,
        });
    }

    let mut distance_meters = 0_u64;
    let mut duration_seconds = 0_u64;
    let mut unreachable_legs = 0_usize;
    for (from, to) in order.legs() {
        match matrix.leg(from, to) {
            Some(leg) => {
                distance_meters = distance_meters.saturating_add(leg.distance_meters);
                duration_seconds = duration_seconds.saturating_add(leg.duration_seconds);
            }
            None => {
                distance_meters = distance_meters.saturating_add(UNREACHABLE_COST);
                duration_seconds = duration_seconds.saturating_add(UNREACHABLE_COST);
                unreachable_legs += 1;
            }
        }
    }

    let share_url = share_url(steps.iter().map(|step| step.address.as_str()));
    Ok(RouteResult {
        steps,
        total_distance_km: round_to(distance_meters as f64 / METRES_PER_KM, 100.0),
        total_duration_min: round_to(duration_seconds as f64 / SECONDS_PER_MINUTE, 10.0),
        share_url,
        unreachable_legs,
    })
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}
