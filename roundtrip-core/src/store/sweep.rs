//! Batched purge of expired routes, shared by every backend.

use std::time::SystemTime;

use super::{RouteStore, StorageError};

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Entries removed.
    pub deleted: usize,
    /// Entries whose batch failed to commit.
    pub errors: usize,
    /// Batches that committed.
    pub batches: usize,
}

/// Delete every entry of `store` that expired before `now`.
///
/// Expired codes are split into batches of at most `batch_limit` (a limit of
/// zero is treated as one). Each batch commits on its own; a failed batch is
/// logged, its size added to [`SweepReport::errors`], and the sweep carries
/// on with the next.
///
/// # Errors
///
/// Returns the backend error only when the expired codes cannot be listed.
///
/// # Examples
/// ```
/// use std::time::SystemTime;
/// use roundtrip_core::{MemoryRouteStore, SweepReport, sweep_expired};
///
/// let store = MemoryRouteStore::new();
/// let report = sweep_expired(&store, SystemTime::now(), 500).expect("scan succeeds");
/// assert_eq!(report, SweepReport::default());
/// ```
pub fn sweep_expired<S>(
    store: &S,
    now: SystemTime,
    batch_limit: usize,
) -> Result<SweepReport, StorageError>
where
    S: RouteStore + ?Sized,
{
    let expired = store.expired_codes(now)?;
    let mut report = SweepReport::default();

    for (ordinal, batch) in expired.chunks(batch_limit.max(1)).enumerate() {
        match store.delete_batch(batch) {
            Ok(deleted) => {
                report.deleted += deleted;
                report.batches += 1;
            }
            Err(error) => {
                log::warn!(
                    "sweep batch {} of {} codes failed: {error}",
                    ordinal + 1,
                    batch.len()
                );
                report.errors += batch.len();
            }
        }
    }

    log::info!(
        "swept {} {} store: deleted {}, errors {}, batches {}",
        expired.len(),
        store.kind(),
        report.deleted,
        report.errors,
        report.batches
    );
    Ok(report)
}
