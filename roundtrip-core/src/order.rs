//! Closed visiting orders over matrix indices.

use crate::{ComputationError, CostMetric, DistanceMatrix};

/// A closed tour over matrix indices.
///
/// The order has length `n + 1` for an `n`-point matrix. Its first and last
/// entries are the home index and the interior visits every other index
/// exactly once.
///
/// # Examples
/// ```
/// use roundtrip_core::RouteOrder;
///
/// # fn main() -> Result<(), roundtrip_core::ComputationError> {
/// let order = RouteOrder::closed_tour(0, [2, 1], 3)?;
/// assert_eq!(order.indices(), &[0, 2, 1, 0]);
/// assert_eq!(order.stops(), &[2, 1]);
/// assert!(RouteOrder::closed_tour(0, [2, 2], 3).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOrder {
    indices: Vec<usize>,
}

impl RouteOrder {
    /// Validate a complete order for an `size`-point matrix.
    ///
    /// # Errors
    ///
    /// Returns a [`ComputationError`] when the order is not a closed tour
    /// visiting every non-home index exactly once.
    pub fn new(indices: Vec<usize>, size: usize) -> Result<Self, ComputationError> {
        if size < 2 || indices.len() != size + 1 {
            return Err(ComputationError::new(format!(
                "route order of length {} cannot cover {size} points",
                indices.len()
            )));
        }
        let (Some(&home), Some(&end)) = (indices.first(), indices.last()) else {
            return Err(ComputationError::new("route order is empty"));
        };
        if home != end {
            return Err(ComputationError::new(format!(
                "route order starts at {home} but ends at {end}"
            )));
        }
        if home >= size {
            return Err(ComputationError::new(format!(
                "home index {home} is outside {size} points"
            )));
        }

        let mut seen = vec![false; size];
        if let Some(slot) = seen.get_mut(home) {
            *slot = true;
        }
        for &index in indices.iter().skip(1).take(size - 1) {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(ComputationError::new(format!(
                        "index {index} appears more than once in the route order"
                    )));
                }
                None => {
                    return Err(ComputationError::new(format!(
                        "index {index} is outside {size} points"
                    )));
                }
            }
        }

        Ok(Self { indices })
    }

    /// Build and validate `home → stops… → home`.
    ///
    /// # Errors
    ///
    /// See [`RouteOrder::new`].
    pub fn closed_tour<I>(home: usize, stops: I, size: usize) -> Result<Self, ComputationError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut indices = Vec::with_capacity(size + 1);
        indices.push(home);
        indices.extend(stops);
        indices.push(home);
        Self::new(indices, size)
    }

    /// Every index in visiting order, home first and last.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The home index.
    #[must_use]
    pub fn home(&self) -> usize {
        self.indices.first().copied().unwrap_or_default()
    }

    /// Interior indices, excluding both home visits.
    #[must_use]
    pub fn stops(&self) -> &[usize] {
        let interior = self.indices.len().saturating_sub(1);
        self.indices.get(1..interior).unwrap_or_default()
    }

    /// Consecutive `(from, to)` legs along the order.
    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.indices.windows(2).filter_map(|pair| match pair {
            [from, to] => Some((*from, *to)),
            _ => None,
        })
    }

    /// Number of entries, including both home visits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always `false`; a validated order covers at least three entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Total cost of the tour under `metric`.
    #[must_use]
    pub fn cost(&self, matrix: &DistanceMatrix, metric: CostMetric) -> u64 {
        matrix.path_cost(&self.indices, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::too_short(vec![0, 1, 0], 3)]
    #[case::open_tour(vec![0, 1, 2, 1], 3)]
    #[case::repeated_stop(vec![0, 1, 1, 0], 3)]
    #[case::home_in_interior(vec![0, 0, 1, 0], 3)]
    #[case::out_of_range(vec![0, 1, 5, 0], 3)]
    #[case::single_point(vec![0, 0], 1)]
    fn rejects_malformed_orders(#[case] indices: Vec<usize>, #[case] size: usize) {
        assert!(RouteOrder::new(indices, size).is_err());
    }

    #[rstest]
    fn accepts_non_zero_home() {
        let order = RouteOrder::closed_tour(2, [0, 1], 3).expect("valid order");
        assert_eq!(order.home(), 2);
        assert_eq!(order.stops(), &[0, 1]);
        assert_eq!(order.legs().collect::<Vec<_>>(), vec![(2, 0), (0, 1), (1, 2)]);
    }
}
