//! `LocalSolver` implementation.

use roundtrip_core::{
    CostMetric, RouteOrder, RouteSolver, SolveError, SolveRequest, UNREACHABLE_COST,
};

use crate::exact::best_permutation;
use crate::nearest::nearest_neighbour;

/// Largest stop count ordered by exhaustive search by default.
pub const DEFAULT_EXACT_LIMIT: usize = 8;

/// Configuration for [`LocalSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSolverConfig {
    /// Stop counts up to this value use exhaustive search; larger counts use
    /// the nearest-neighbour heuristic.
    pub exact_limit: usize,
    /// Matrix value minimised by the search.
    pub metric: CostMetric,
}

impl Default for LocalSolverConfig {
    fn default() -> Self {
        Self {
            exact_limit: DEFAULT_EXACT_LIMIT,
            metric: CostMetric::default(),
        }
    }
}

impl LocalSolverConfig {
    /// Override the exhaustive search threshold.
    #[must_use]
    pub const fn with_exact_limit(mut self, exact_limit: usize) -> Self {
        self.exact_limit = exact_limit;
        self
    }

    /// Override the minimised metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: CostMetric) -> Self {
        self.metric = metric;
        self
    }
}

/// Solver that orders stops from the matrix alone.
///
/// # Examples
///
/// ```rust
/// use roundtrip_core::{DistanceMatrix, LegCost, RouteSolver, SolveRequest};
/// use roundtrip_solver_local::LocalSolver;
///
/// let costs = [[0, 10, 15], [10, 0, 5], [15, 5, 0]];
/// let matrix = DistanceMatrix::from_fn(3, |from, to| {
///     let value = costs.get(from).and_then(|row| row.get(to)).copied().unwrap_or_default();
///     Some(LegCost::new(value, value))
/// });
///
/// let order = LocalSolver::new().solve(&SolveRequest::new(&matrix, 0))?;
/// assert_eq!(order.indices(), &[0, 1, 2, 0]);
/// # Ok::<(), roundtrip_core::SolveError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSolver {
    config: LocalSolverConfig,
}

impl LocalSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: LocalSolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &LocalSolverConfig {
        &self.config
    }
}

impl RouteSolver for LocalSolver {
    fn solve(&self, request: &SolveRequest<'_>) -> Result<RouteOrder, SolveError> {
        let count = request.validate()?;
        let matrix = request.matrix();
        let home = request.home_index();
        let metric = self.config.metric;
        let stops = request.stop_indices();

        let visits = if count == 1 {
            stops
        } else if count <= self.config.exact_limit {
            log::debug!("ordering {count} stops by exhaustive search");
            best_permutation(matrix, home, stops, metric)
        } else {
            log::debug!("ordering {count} stops by nearest neighbour");
            nearest_neighbour(matrix, home, stops, metric)
        };

        let order = RouteOrder::closed_tour(home, visits, matrix.size())?;
        let cost = order.cost(matrix, metric);
        if cost >= UNREACHABLE_COST {
            log::warn!("best tour over {count} stops includes unreachable legs (cost {cost})");
        }
        Ok(order)
    }
}
