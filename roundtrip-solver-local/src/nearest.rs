//! Greedy nearest-neighbour ordering.

use roundtrip_core::{CostMetric, DistanceMatrix};

/// Order `stops` by repeatedly moving to the cheapest unvisited stop.
///
/// Candidates are kept in ascending index order, so ties, including the case
/// where every remaining stop is unreachable, go to the lowest index.
pub(crate) fn nearest_neighbour(
    matrix: &DistanceMatrix,
    home: usize,
    mut stops: Vec<usize>,
    metric: CostMetric,
) -> Vec<usize> {
    stops.sort_unstable();
    let mut tour = Vec::with_capacity(stops.len());
    let mut current = home;

    while let Some(position) = cheapest_from(matrix, current, &stops, metric) {
        let next = stops.remove(position);
        tour.push(next);
        current = next;
    }

    tour
}

fn cheapest_from(
    matrix: &DistanceMatrix,
    from: usize,
    candidates: &[usize],
    metric: CostMetric,
) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .min_by_key(|&(_, &candidate)| matrix.cost(from, candidate, metric))
        .map(|(position, _)| position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtrip_core::LegCost;
    use roundtrip_core::test_support::symmetric_matrix;
    use rstest::rstest;

    #[rstest]
    fn follows_cheapest_edges() {
        let matrix = symmetric_matrix(&[
            &[0],
            &[50, 0],
            &[5, 40, 0],
            &[30, 1, 6, 0],
        ]);
        let tour = nearest_neighbour(&matrix, 0, vec![1, 2, 3], CostMetric::Duration);
        assert_eq!(tour, vec![2, 3, 1]);
    }

    #[rstest]
    fn ties_go_to_lowest_index() {
        let matrix = symmetric_matrix(&[&[0], &[7, 0], &[7, 7, 0], &[7, 7, 7, 0]]);
        let tour = nearest_neighbour(&matrix, 0, vec![3, 1, 2], CostMetric::Duration);
        assert_eq!(tour, vec![1, 2, 3]);
    }

    #[rstest]
    fn unreachable_stops_are_still_visited() {
        let matrix = roundtrip_core::DistanceMatrix::from_fn(4, |from, to| {
            (from == to).then(LegCost::default)
        });
        let tour = nearest_neighbour(&matrix, 0, vec![1, 2, 3], CostMetric::Duration);
        assert_eq!(tour, vec![1, 2, 3]);
    }
}
