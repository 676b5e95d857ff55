//! Acquire pairwise distances between addresses.
//!
//! The [`DistanceMatrixSource`] trait abstracts the mapping provider that
//! resolves an ordered list of addresses into a [`DistanceMatrix`]. The core
//! never computes distances itself; it only consumes the matrix.
//!
//! Whole-call failures are reported as a single [`ProviderError`]. Pairs the
//! provider cannot resolve are returned as unreachable cells instead.

mod error;

pub use error::ProviderError;

use crate::DistanceMatrix;

/// Fetch a distance matrix for an ordered list of addresses.
///
/// Implementers must return an `n×n` matrix where `n == addresses.len()`,
/// aligned by list position. Retry policy belongs to the caller.
///
/// # Examples
///
/// ```rust
/// use roundtrip_core::{DistanceMatrix, DistanceMatrixSource, LegCost, ProviderError};
///
/// struct UnitSource;
///
/// impl DistanceMatrixSource for UnitSource {
///     fn fetch(&self, addresses: &[String]) -> Result<DistanceMatrix, ProviderError> {
///         if addresses.is_empty() {
///             return Err(ProviderError::EmptyInput);
///         }
///         Ok(DistanceMatrix::from_fn(addresses.len(), |from, to| {
///             Some(if from == to { LegCost::default() } else { LegCost::new(1000, 60) })
///         }))
///     }
/// }
///
/// let matrix = UnitSource.fetch(&["Home".to_owned(), "Shop".to_owned()])?;
/// assert_eq!(matrix.size(), 2);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait DistanceMatrixSource {
    /// Return the matrix for `addresses`.
    ///
    /// Implementations must return `Err(ProviderError::EmptyInput)` when
    /// `addresses` is empty.
    fn fetch(&self, addresses: &[String]) -> Result<DistanceMatrix, ProviderError>;
}

impl<T: DistanceMatrixSource + ?Sized> DistanceMatrixSource for Box<T> {
    fn fetch(&self, addresses: &[String]) -> Result<DistanceMatrix, ProviderError> {
        (**self).fetch(addresses)
    }
}

impl<T: DistanceMatrixSource + ?Sized> DistanceMatrixSource for &T {
    fn fetch(&self, addresses: &[String]) -> Result<DistanceMatrix, ProviderError> {
        (**self).fetch(addresses)
    }
}
