//! Property-based tests for the local solver.
//!
//! # Invariants tested
//!
//! - **Closed tour shape:** for stop counts 1, 2, 8, 9 and 20 the order has
//!   `k + 2` entries, starts and ends at home, and visits every other index
//!   exactly once.
//! - **Exact optimality:** up to the exact limit no permutation is cheaper
//!   than the returned tour.
//! - **Heuristic termination:** above the exact limit no stop repeats and the
//!   tour closes at home.
#![expect(
    clippy::expect_used,
    reason = "property tests fail fast when the solver rejects a valid request"
)]

use std::collections::HashSet;

use proptest::prelude::*;
use roundtrip_core::{CostMetric, DistanceMatrix, LegCost, RouteSolver, SolveRequest};
use roundtrip_solver_local::LocalSolver;

/// Matrix strategy with `size` points and optionally unreachable cells.
fn matrix_strategy(size: usize) -> impl Strategy<Value = DistanceMatrix> {
    proptest::collection::vec(proptest::option::weighted(0.9, 1_u64..5_000), size * size).prop_map(
        move |cells| {
            DistanceMatrix::from_fn(size, |from, to| {
                if from == to {
                    return Some(LegCost::default());
                }
                cells
                    .get(from * size + to)
                    .copied()
                    .flatten()
                    .map(|cost| LegCost::new(cost, cost))
            })
        },
    )
}

/// Stop counts paired with a home index inside the matrix.
fn sized_request(counts: &'static [usize]) -> impl Strategy<Value = (DistanceMatrix, usize)> {
    proptest::sample::select(counts).prop_flat_map(|count| {
        let size = count + 1;
        (matrix_strategy(size), 0..size)
    })
}

/// Every ordering of `items`, by recursive insertion.
fn all_orderings(items: &[usize]) -> Vec<Vec<usize>> {
    let Some((first, rest)) = items.split_first() else {
        return vec![Vec::new()];
    };
    let mut orderings = Vec::new();
    for tail in all_orderings(rest) {
        for position in 0..=tail.len() {
            let mut ordering = tail.clone();
            ordering.insert(position, *first);
            orderings.push(ordering);
        }
    }
    orderings
}

fn assert_closed_tour(indices: &[usize], home: usize, size: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(indices.len(), size + 1);
    prop_assert_eq!(indices.first().copied(), Some(home));
    prop_assert_eq!(indices.last().copied(), Some(home));

    let interior: Vec<usize> = indices
        .iter()
        .copied()
        .skip(1)
        .take(size.saturating_sub(1))
        .collect();
    let unique: HashSet<usize> = interior.iter().copied().collect();
    prop_assert_eq!(unique.len(), interior.len(), "stop visited twice: {:?}", indices);
    prop_assert!(!unique.contains(&home), "home visited mid-tour: {:?}", indices);
    prop_assert!(unique.iter().all(|&index| index < size));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every solve returns a closed tour covering each stop once.
    #[test]
    fn orders_are_closed_tours((matrix, home) in sized_request(&[1, 2, 8, 9, 20])) {
        let order = LocalSolver::new()
            .solve(&SolveRequest::new(&matrix, home))
            .expect("valid request should solve");
        assert_closed_tour(order.indices(), home, matrix.size())?;
    }

    /// Property: the exact search is never beaten by another permutation.
    #[test]
    fn exact_search_is_optimal((matrix, home) in sized_request(&[2, 3, 4, 5, 6])) {
        let order = LocalSolver::new()
            .solve(&SolveRequest::new(&matrix, home))
            .expect("valid request should solve");
        let found = order.cost(&matrix, CostMetric::Duration);

        let stops: Vec<usize> = (0..matrix.size()).filter(|&index| index != home).collect();
        for ordering in all_orderings(&stops) {
            let cost = matrix.tour_cost(home, &ordering, CostMetric::Duration);
            prop_assert!(found <= cost, "{:?} costs {} < {}", ordering, cost, found);
        }
    }

    /// Property: the heuristic never repeats a stop and always returns home.
    #[test]
    fn heuristic_terminates_at_home((matrix, home) in sized_request(&[9, 15, 30])) {
        let order = LocalSolver::new()
            .solve(&SolveRequest::new(&matrix, home))
            .expect("valid request should solve");
        assert_closed_tour(order.indices(), home, matrix.size())?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Property: optimality holds at the exact limit itself.
    #[test]
    fn exact_search_is_optimal_at_the_limit(matrix in matrix_strategy(9)) {
        let order = LocalSolver::new()
            .solve(&SolveRequest::new(&matrix, 0))
            .expect("valid request should solve");
        let found = order.cost(&matrix, CostMetric::Duration);

        let stops: Vec<usize> = (1..matrix.size()).collect();
        let cheapest = all_orderings(&stops)
            .iter()
            .map(|ordering| matrix.tour_cost(0, ordering, CostMetric::Duration))
            .min()
            .expect("at least one ordering");
        prop_assert_eq!(found, cheapest);
    }
}
