//! Deterministic doubles for unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use crate::store::{BackendKind, RouteCode, RouteStore, StorageError, StoredRoute, SweepReport};
use crate::{
    Clock, DistanceMatrix, DistanceMatrixSource, LegCost, ProviderError, RouteOrder, RouteResult,
    Waypoint, assemble,
};

/// Clock that only moves when told to.
///
/// Starts at a whole second so millisecond round trips through storage are
/// exact.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }
}

impl ManualClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn at(now: SystemTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Jump to `now`.
    pub fn set(&self, now: SystemTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`DistanceMatrixSource`] returning a canned outcome.
#[derive(Debug)]
pub struct FixedMatrixSource {
    outcome: Result<DistanceMatrix, ProviderError>,
    calls: AtomicUsize,
}

impl FixedMatrixSource {
    /// Always return `matrix`, whatever the addresses.
    #[must_use]
    pub const fn with_matrix(matrix: DistanceMatrix) -> Self {
        Self {
            outcome: Ok(matrix),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub const fn with_error(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Matrix from a cost table where metres and seconds share one value.
    ///
    /// Missing cells are mirrored from the opposite direction, so a lower
    /// triangle is enough; cells missing both ways are unreachable.
    #[must_use]
    pub fn symmetric(costs: &[&[u64]]) -> Self {
        Self::with_matrix(symmetric_matrix(costs))
    }

    /// How many times `fetch` ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DistanceMatrixSource for FixedMatrixSource {
    fn fetch(&self, addresses: &[String]) -> Result<DistanceMatrix, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if addresses.is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        self.outcome.clone()
    }
}

/// Build a matrix as described on [`FixedMatrixSource::symmetric`].
#[must_use]
pub fn symmetric_matrix(costs: &[&[u64]]) -> DistanceMatrix {
    let cell = |from: usize, to: usize| costs.get(from).and_then(|row| row.get(to)).copied();
    DistanceMatrix::from_fn(costs.len(), |from, to| {
        cell(from, to)
            .or_else(|| cell(to, from))
            .map(|value| LegCost::new(value, value))
    })
}

/// Home followed by `stops` numbered stops.
#[must_use]
pub fn waypoints(stops: usize) -> Vec<Waypoint> {
    let home = Waypoint::home("1 Home Street").expect("home address is non-empty");
    std::iter::once(home)
        .chain((1..=stops).map(|index| {
            Waypoint::stop(format!("{index} Stop Lane"), format!("stop {index}"))
                .expect("stop address is non-empty")
        }))
        .collect()
}

/// A small feasible route for storage tests: 4.3 km over three legs.
#[must_use]
pub fn sample_route() -> RouteResult {
    let waypoints = waypoints(2);
    let matrix = symmetric_matrix(&[&[0], &[1200, 0], &[2300, 800, 0]]);
    let order = RouteOrder::closed_tour(0, [1, 2], 3).expect("fixed order is valid");
    assemble(&order, &waypoints, &matrix).expect("fixed route assembles")
}

/// Store wrapper whose chosen sweep batches fail.
///
/// Batches are numbered from zero in the order `delete_batch` is called.
#[derive(Debug)]
pub struct FailingBatchStore<S> {
    inner: S,
    failing: Vec<usize>,
    batches_seen: AtomicUsize,
}

impl<S: RouteStore> FailingBatchStore<S> {
    /// Wrap `inner`, failing every batch whose ordinal is in `failing`.
    pub fn new(inner: S, failing: impl IntoIterator<Item = usize>) -> Self {
        Self {
            inner,
            failing: failing.into_iter().collect(),
            batches_seen: AtomicUsize::new(0),
        }
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: RouteStore> RouteStore for FailingBatchStore<S> {
    fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    fn now(&self) -> SystemTime {
        self.inner.now()
    }

    fn put(&self, code: &RouteCode, payload: RouteResult) -> Result<StoredRoute, StorageError> {
        self.inner.put(code, payload)
    }

    fn get_record(&self, code: &RouteCode) -> Result<Option<StoredRoute>, StorageError> {
        self.inner.get_record(code)
    }

    fn delete(&self, code: &RouteCode) -> Result<(), StorageError> {
        self.inner.delete(code)
    }

    fn expired_codes(&self, now: SystemTime) -> Result<Vec<RouteCode>, StorageError> {
        self.inner.expired_codes(now)
    }

    fn delete_batch(&self, codes: &[RouteCode]) -> Result<usize, StorageError> {
        let ordinal = self.batches_seen.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&ordinal) {
            return Err(StorageError::Backend {
                message: format!("injected failure for batch {ordinal}"),
            });
        }
        self.inner.delete_batch(codes)
    }
}

/// Report expected from a sweep that only succeeded.
#[must_use]
pub const fn clean_sweep(deleted: usize, batches: usize) -> SweepReport {
    SweepReport {
        deleted,
        errors: 0,
        batches,
    }
}
