//! Glue that runs source, solver and assembler in sequence.

use crate::{
    ComputationError, DistanceMatrixSource, InputError, RouteError, RouteResult, RouteSolver,
    SolveRequest, Waypoint, assemble,
};

/// Plans a round trip from a home waypoint and a list of stops.
///
/// The planner owns a [`DistanceMatrixSource`] and a [`RouteSolver`] and is
/// otherwise stateless, so one instance can serve concurrent requests.
///
/// # Examples
/// ```
/// # #[cfg(feature = "test-support")]
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use roundtrip_core::{RouteOrder, RoutePlanner, RouteSolver, SolveError, SolveRequest, Waypoint};
/// use roundtrip_core::test_support::FixedMatrixSource;
///
/// struct InputOrder;
///
/// impl RouteSolver for InputOrder {
///     fn solve(&self, request: &SolveRequest<'_>) -> Result<RouteOrder, SolveError> {
///         request.validate()?;
///         let size = request.matrix().size();
///         Ok(RouteOrder::closed_tour(request.home_index(), request.stop_indices(), size)?)
///     }
/// }
///
/// let source = FixedMatrixSource::symmetric(&[&[0, 600], &[600, 0]]);
/// let planner = RoutePlanner::new(source, InputOrder);
/// let result = planner.plan(Waypoint::home("Home")?, vec![Waypoint::stop("Shop", "")?])?;
/// assert_eq!(result.steps().len(), 3);
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "test-support"))]
/// # fn main() {}
/// ```
#[derive(Debug, Clone)]
pub struct RoutePlanner<S, V> {
    source: S,
    solver: V,
}

impl<S, V> RoutePlanner<S, V>
where
    S: DistanceMatrixSource,
    V: RouteSolver,
{
    /// Combine a matrix source and a solver.
    pub const fn new(source: S, solver: V) -> Self {
        Self { source, solver }
    }

    /// Borrow the configured solver.
    pub const fn solver(&self) -> &V {
        &self.solver
    }

    /// Fetch the matrix, solve, and assemble the result.
    ///
    /// Home is placed at index 0 and stops follow in the order given.
    ///
    /// # Errors
    ///
    /// - [`InputError::NoWaypoints`] when `stops` is empty; the source is not
    ///   called.
    /// - [`RouteError::Provider`] when the source fails.
    /// - [`RouteError::Computation`] when the source returns a matrix of the
    ///   wrong size or solving fails unexpectedly.
    pub fn plan(&self, home: Waypoint, stops: Vec<Waypoint>) -> Result<RouteResult, RouteError> {
        if stops.is_empty() {
            return Err(InputError::NoWaypoints.into());
        }

        let mut waypoints = Vec::with_capacity(stops.len() + 1);
        waypoints.push(home);
        waypoints.extend(stops);

        let addresses: Vec<String> = waypoints
            .iter()
            .map(|waypoint| waypoint.address().to_owned())
            .collect();
        log::debug!("fetching distance matrix for {} addresses", addresses.len());
        let matrix = self.source.fetch(&addresses)?;
        if matrix.size() != waypoints.len() {
            return Err(ComputationError::new(format!(
                "matrix size mismatch: expected {} points, source returned {}",
                waypoints.len(),
                matrix.size()
            ))
            .into());
        }

        let request = SolveRequest::new(&matrix, 0).with_waypoints(&waypoints);
        let order = self.solver.solve(&request)?;
        let result = assemble(&order, &waypoints, &matrix)?;
        if !result.is_feasible() {
            log::warn!(
                "route contains {} unreachable legs; totals include the unreachable penalty",
                result.unreachable_legs()
            );
        }
        Ok(result)
    }
}
