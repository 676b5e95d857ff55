//! Exhaustive permutation search.

use roundtrip_core::{CostMetric, DistanceMatrix};

/// Cheapest ordering of `stops` for the closed tour from `home`.
///
/// Permutations are generated in lexicographic order starting from `stops`
/// sorted ascending. Only a strictly cheaper tour replaces the incumbent, so
/// the first minimum wins.
pub(crate) fn best_permutation(
    matrix: &DistanceMatrix,
    home: usize,
    mut stops: Vec<usize>,
    metric: CostMetric,
) -> Vec<usize> {
    stops.sort_unstable();
    let mut best = stops.clone();
    let mut best_cost = matrix.tour_cost(home, &stops, metric);

    while next_permutation(&mut stops) {
        let cost = matrix.tour_cost(home, &stops, metric);
        if cost < best_cost {
            best_cost = cost;
            best.clone_from(&stops);
        }
    }

    log::debug!(
        "exact search over {} stops found tour cost {best_cost}",
        best.len()
    );
    best
}

/// Advance `items` to the next lexicographic permutation.
///
/// Returns `false`, leaving `items` untouched, once the last permutation has
/// been reached.
pub(crate) fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items
        .windows(2)
        .rposition(|pair| matches!(pair, [left, right] if left < right))
    else {
        return false;
    };
    let Some(pivot_value) = items.get(pivot).copied() else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|&item| item > pivot_value) else {
        return false;
    };
    items.swap(pivot, successor);
    if let Some(tail) = items.get_mut(pivot + 1..) {
        tail.reverse();
    }
    true
}
