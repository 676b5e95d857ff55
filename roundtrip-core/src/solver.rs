//! The strategy seam that turns a matrix into a visiting order.

use crate::{DistanceMatrix, InputError, RouteOrder, SolveError, Waypoint};

/// Parameters for a solve call.
///
/// The matrix and the home index are always present. Waypoints are optional:
/// strategies that order by matrix cost ignore them, while strategies that
/// delegate ordering to a mapping provider need the addresses.
///
/// # Examples
/// ```rust
/// use roundtrip_core::{DistanceMatrix, LegCost, SolveRequest};
///
/// let matrix = DistanceMatrix::from_fn(3, |_, _| Some(LegCost::default()));
/// let request = SolveRequest::new(&matrix, 0);
/// assert_eq!(request.validate(), Ok(2));
/// assert_eq!(request.stop_indices(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolveRequest<'a> {
    matrix: &'a DistanceMatrix,
    home_index: usize,
    waypoints: Option<&'a [Waypoint]>,
}

impl<'a> SolveRequest<'a> {
    /// Request a tour over `matrix` anchored at `home_index`.
    #[must_use]
    pub const fn new(matrix: &'a DistanceMatrix, home_index: usize) -> Self {
        Self {
            matrix,
            home_index,
            waypoints: None,
        }
    }

    /// Attach the waypoints the matrix was fetched for.
    #[must_use]
    pub const fn with_waypoints(mut self, waypoints: &'a [Waypoint]) -> Self {
        self.waypoints = Some(waypoints);
        self
    }

    /// The pairwise matrix.
    #[must_use]
    pub const fn matrix(&self) -> &'a DistanceMatrix {
        self.matrix
    }

    /// Index of home in the matrix.
    #[must_use]
    pub const fn home_index(&self) -> usize {
        self.home_index
    }

    /// Waypoints aligned with the matrix, when supplied.
    #[must_use]
    pub const fn waypoints(&self) -> Option<&'a [Waypoint]> {
        self.waypoints
    }

    /// Check the request and return the number of waypoints to visit.
    ///
    /// # Errors
    ///
    /// - [`InputError::HomeOutOfRange`] when home does not address a row.
    /// - [`InputError::WaypointCountMismatch`] when supplied waypoints do not
    ///   line up with the matrix.
    /// - [`InputError::NoWaypoints`] when home is the only point.
    pub fn validate(&self) -> Result<usize, InputError> {
        let size = self.matrix.size();
        if self.home_index >= size {
            return Err(InputError::HomeOutOfRange {
                home_index: self.home_index,
                size,
            });
        }
        if let Some(waypoints) = self.waypoints
            && waypoints.len() != size
        {
            return Err(InputError::WaypointCountMismatch {
                waypoints: waypoints.len(),
                size,
            });
        }
        match size - 1 {
            0 => Err(InputError::NoWaypoints),
            count => Ok(count),
        }
    }

    /// Every non-home index in ascending order.
    #[must_use]
    pub fn stop_indices(&self) -> Vec<usize> {
        (0..self.matrix.size())
            .filter(|&index| index != self.home_index)
            .collect()
    }
}

/// Compute a closed visiting order for a request.
///
/// Implementations return [`InputError::NoWaypoints`] when there is nothing
/// to visit rather than panicking, and surface exactly one error per call.
/// Solvers must be `Send + Sync` to serve concurrent requests.
pub trait RouteSolver: Send + Sync {
    /// Solve a request, producing a validated order or an error.
    fn solve(&self, request: &SolveRequest<'_>) -> Result<RouteOrder, SolveError>;
}

impl<T: RouteSolver + ?Sized> RouteSolver for Box<T> {
    fn solve(&self, request: &SolveRequest<'_>) -> Result<RouteOrder, SolveError> {
        (**self).solve(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LegCost;
    use rstest::rstest;

    struct InOrderSolver;

    impl RouteSolver for InOrderSolver {
        fn solve(&self, request: &SolveRequest<'_>) -> Result<RouteOrder, SolveError> {
            request.validate()?;
            let order = RouteOrder::closed_tour(
                request.home_index(),
                request.stop_indices(),
                request.matrix().size(),
            )?;
            Ok(order)
        }
    }

    fn unit_matrix(size: usize) -> DistanceMatrix {
        DistanceMatrix::from_fn(size, |_, _| Some(LegCost::default()))
    }

    #[rstest]
    #[case(0, 1, InputError::HomeOutOfRange { home_index: 1, size: 0 })]
    #[case(1, 0, InputError::NoWaypoints)]
    #[case(3, 3, InputError::HomeOutOfRange { home_index: 3, size: 3 })]
    fn validate_rejects_unroutable_requests(
        #[case] size: usize,
        #[case] home_index: usize,
        #[case] expected: InputError,
    ) {
        let matrix = unit_matrix(size);
        let err = SolveRequest::new(&matrix, home_index)
            .validate()
            .expect_err("request should be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn validate_checks_waypoint_alignment() {
        let matrix = unit_matrix(3);
        let waypoints = vec![Waypoint::home("Home").expect("home")];
        let err = SolveRequest::new(&matrix, 0)
            .with_waypoints(&waypoints)
            .validate()
            .expect_err("misaligned waypoints");
        assert_eq!(
            err,
            InputError::WaypointCountMismatch {
                waypoints: 1,
                size: 3
            }
        );
    }

    #[rstest]
    fn boxed_solvers_delegate() {
        let solver: Box<dyn RouteSolver> = Box::new(InOrderSolver);
        let matrix = unit_matrix(3);
        let order = solver
            .solve(&SolveRequest::new(&matrix, 1))
            .expect("valid request");
        assert_eq!(order.indices(), &[1, 0, 2, 1]);
    }
}
