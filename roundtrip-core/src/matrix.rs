//! Pairwise distance and duration matrices.

use crate::InputError;

/// Additive cost charged for a leg the source could not resolve.
///
/// Large enough that any tour with an unreachable leg costs more than every
/// fully reachable tour, yet small enough that summing one per leg never
/// overflows `u64` for the tour sizes the solvers accept.
pub const UNREACHABLE_COST: u64 = 1_000_000_000;

/// Travel distance and time for one ordered pair of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegCost {
    /// Travel distance in metres.
    pub distance_meters: u64,
    /// Travel time in seconds.
    pub duration_seconds: u64,
}

impl LegCost {
    /// Construct a leg from metres and seconds.
    #[must_use]
    pub const fn new(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }

    /// The value minimised under `metric`.
    #[must_use]
    pub const fn cost(self, metric: CostMetric) -> u64 {
        match metric {
            CostMetric::Duration => self.duration_seconds,
            CostMetric::Distance => self.distance_meters,
        }
    }
}

/// Which matrix value a solver minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostMetric {
    /// Minimise total travel time.
    #[default]
    Duration,
    /// Minimise total travel distance.
    Distance,
}

/// Square matrix of [`LegCost`] values between `n` points.
///
/// `None` cells mark pairs the source could not resolve. Indexing is shared
/// 1:1 with the waypoint list the matrix was fetched for.
///
/// # Examples
/// ```
/// use roundtrip_core::{CostMetric, DistanceMatrix, LegCost, UNREACHABLE_COST};
///
/// # fn main() -> Result<(), roundtrip_core::InputError> {
/// let matrix = DistanceMatrix::from_rows(vec![
///     vec![Some(LegCost::default()), Some(LegCost::new(1200, 60))],
///     vec![None, Some(LegCost::default())],
/// ])?;
///
/// assert_eq!(matrix.cost(0, 1, CostMetric::Distance), 1200);
/// assert_eq!(matrix.cost(1, 0, CostMetric::Duration), UNREACHABLE_COST);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<Option<LegCost>>,
}

impl DistanceMatrix {
    /// Build a matrix from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MatrixNotSquare`] when any row length differs
    /// from the number of rows.
    pub fn from_rows(rows: Vec<Vec<Option<LegCost>>>) -> Result<Self, InputError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size.saturating_mul(size));
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(InputError::MatrixNotSquare {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self { size, cells })
    }

    /// Build a matrix by evaluating `cell(from, to)` for every ordered pair.
    pub fn from_fn<F>(size: usize, mut cell: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<LegCost>,
    {
        let cells = (0..size)
            .flat_map(|from| (0..size).map(move |to| (from, to)))
            .map(|(from, to)| cell(from, to))
            .collect();
        Self { size, cells }
    }

    /// Number of points covered by the matrix.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix covers no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The leg from `from` to `to`, or `None` when unreachable.
    ///
    /// Indices outside the matrix are reported as unreachable.
    #[must_use]
    pub fn leg(&self, from: usize, to: usize) -> Option<LegCost> {
        if from >= self.size || to >= self.size {
            log::warn!(
                "matrix lookup ({from}, {to}) is outside a matrix of size {}",
                self.size
            );
            debug_assert!(false, "matrix lookup ({from}, {to}) out of range");
            return None;
        }
        self.cells
            .get(from * self.size + to)
            .copied()
            .flatten()
    }

    /// Cost of the leg under `metric`, charging [`UNREACHABLE_COST`] for
    /// unreachable pairs.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize, metric: CostMetric) -> u64 {
        self.leg(from, to)
            .map_or(UNREACHABLE_COST, |leg| leg.cost(metric))
    }

    /// Sum of leg costs along consecutive pairs of `path`.
    #[must_use]
    pub fn path_cost(&self, path: &[usize], metric: CostMetric) -> u64 {
        path.windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(self.cost(*from, *to, metric)),
                _ => None,
            })
            .fold(0_u64, u64::saturating_add)
    }

    /// Cost of the closed tour `home → stops… → home`.
    #[must_use]
    pub fn tour_cost(&self, home: usize, stops: &[usize], metric: CostMetric) -> u64 {
        let Some((first, last)) = stops.first().zip(stops.last()) else {
            return 0;
        };
        self.cost(home, *first, metric)
            .saturating_add(self.path_cost(stops, metric))
            .saturating_add(self.cost(*last, home, metric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn triangle() -> DistanceMatrix {
        let legs = [[0, 10, 15], [10, 0, 5], [15, 5, 0]];
        DistanceMatrix::from_fn(3, |from, to| {
            let value = legs[from][to];
            Some(LegCost::new(value * 100, value))
        })
    }

    #[rstest]
    fn rejects_ragged_rows() {
        let err = DistanceMatrix::from_rows(vec![
            vec![Some(LegCost::default()), None],
            vec![None],
        ])
        .expect_err("ragged rows should fail");
        assert_eq!(
            err,
            InputError::MatrixNotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[rstest]
    fn metric_selects_matrix_value(triangle: DistanceMatrix) {
        assert_eq!(triangle.cost(0, 2, CostMetric::Duration), 15);
        assert_eq!(triangle.cost(0, 2, CostMetric::Distance), 1500);
    }

    #[rstest]
    fn tour_cost_closes_the_loop(triangle: DistanceMatrix) {
        assert_eq!(triangle.tour_cost(0, &[1, 2], CostMetric::Duration), 30);
        assert_eq!(triangle.tour_cost(0, &[2, 1], CostMetric::Duration), 30);
        assert_eq!(triangle.tour_cost(0, &[], CostMetric::Duration), 0);
    }

    #[rstest]
    fn unreachable_legs_charge_sentinel() {
        let matrix = DistanceMatrix::from_fn(2, |from, to| {
            (from == to).then(LegCost::default)
        });
        assert_eq!(
            matrix.tour_cost(0, &[1], CostMetric::Duration),
            2 * UNREACHABLE_COST
        );
    }
}
