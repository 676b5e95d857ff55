//! Provider-delegated ordering via the Google Directions API.
//!
//! Google reorders intermediate waypoints when the `waypoints` parameter is
//! prefixed with `optimize:true`. The returned `waypoint_order` indexes the
//! submitted stops and is mapped back onto matrix indices here.

use std::sync::Arc;

use roundtrip_core::{
    ComputationError, InputError, ProviderError, RouteOrder, RouteSolver, SolveError, SolveRequest,
    Waypoint,
};

use super::client::{ClientBuildError, GoogleClient};
use super::config::{GoogleMapsConfig, TravelMode};
use super::types::{DirectionsResponse, ServiceStatus};

/// Most intermediate waypoints the Directions API optimises in one request.
pub const MAX_OPTIMISED_WAYPOINTS: usize = 25;

const SERVICE: &str = "directions";

/// Route solver that asks Google to order the stops.
///
/// The request must carry waypoints alongside the matrix; the matrix is only
/// used for validation and to shape the returned [`RouteOrder`].
#[derive(Debug, Clone)]
pub struct GoogleDirectionsSolver {
    client: Arc<GoogleClient>,
}

impl GoogleDirectionsSolver {
    /// Build a solver with its own client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ClientBuildError> {
        Ok(Self::with_client(Arc::new(GoogleClient::new(config)?)))
    }

    /// Build a solver sharing an existing client.
    #[must_use]
    pub const fn with_client(client: Arc<GoogleClient>) -> Self {
        Self { client }
    }
}

impl RouteSolver for GoogleDirectionsSolver {
    fn solve(&self, request: &SolveRequest<'_>) -> Result<RouteOrder, SolveError> {
        let count = request.validate()?;
        let waypoints = request.waypoints().ok_or(InputError::MissingAddresses)?;
        if count > MAX_OPTIMISED_WAYPOINTS {
            return Err(InputError::TooManyWaypoints {
                limit: MAX_OPTIMISED_WAYPOINTS,
                found: count,
            }
            .into());
        }
        if self.client.config().travel_mode == TravelMode::Transit {
            return Err(ProviderError::InvalidRequest {
                message: "waypoints are not supported for transit directions".to_owned(),
            }
            .into());
        }

        let home = request.home_index();
        let stops = request.stop_indices();
        let origin = address_at(waypoints, home)?;
        let via = stops
            .iter()
            .map(|&index| address_at(waypoints, index))
            .collect::<Result<Vec<_>, _>>()?;
        let waypoint_param = format!("optimize:true|{}", via.join("|"));

        log::debug!("asking the provider to order {count} stops");
        let response: DirectionsResponse = self.client.get_json(
            SERVICE,
            &[
                ("origin", origin),
                ("destination", origin),
                ("waypoints", waypoint_param.as_str()),
            ],
        )?;
        if !response.is_ok() {
            return Err(response.service_error().into());
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ComputationError::new("provider returned no routes"))?;

        let visits = map_waypoint_order(&route.waypoint_order, &stops)?;
        Ok(RouteOrder::closed_tour(home, visits, request.matrix().size())?)
    }
}

fn address_at(waypoints: &[Waypoint], index: usize) -> Result<&str, ComputationError> {
    waypoints
        .get(index)
        .map(Waypoint::address)
        .ok_or_else(|| ComputationError::new(format!("no waypoint at index {index}")))
}

/// Translate Google's `waypoint_order` into matrix indices.
///
/// The order must be a permutation of `0..stops.len()`.
fn map_waypoint_order(order: &[usize], stops: &[usize]) -> Result<Vec<usize>, ComputationError> {
    if order.len() != stops.len() {
        return Err(ComputationError::new(format!(
            "provider ordered {} waypoints, expected {}",
            order.len(),
            stops.len()
        )));
    }

    let mut seen = vec![false; stops.len()];
    order
        .iter()
        .map(|&position| {
            let (Some(&stop), Some(flag)) = (stops.get(position), seen.get_mut(position)) else {
                return Err(ComputationError::new(format!(
                    "provider returned waypoint position {position} outside 0..{}",
                    stops.len()
                )));
            };
            if *flag {
                return Err(ComputationError::new(format!(
                    "provider returned waypoint position {position} twice"
                )));
            }
            *flag = true;
            Ok(stop)
        })
        .collect()
}
