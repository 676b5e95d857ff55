//! Expiring storage for assembled routes.
//!
//! A [`RouteStore`] keeps each [`RouteResult`] under a [`RouteCode`] for
//! [`ROUTE_TTL`]. Reads check expiry and delete stale entries as they find
//! them; [`sweep_expired`] purges everything else in bounded batches.
//!
//! Two backends share the contract: [`MemoryRouteStore`] and, with the
//! `store-sqlite` feature, `SqliteRouteStore`. [`open_route_store`] picks one
//! once at start-up.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::{Clock, RouteResult};

mod code;
mod error;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;
mod sweep;

pub use code::{ROUTE_CODE_LEN, RouteCode, RouteCodeError};
pub use error::StorageError;
pub use memory::MemoryRouteStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteRouteStore;
pub use sweep::{SweepReport, sweep_expired};

/// How long a stored route stays retrievable.
pub const ROUTE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of codes deleted in one sweep batch.
pub const SWEEP_BATCH_LIMIT: usize = 500;

/// A route as held by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRoute {
    code: RouteCode,
    payload: RouteResult,
    created_at: SystemTime,
    expires_at: SystemTime,
}

impl StoredRoute {
    /// Record `payload` as created at `now`, expiring after [`ROUTE_TTL`].
    #[must_use]
    pub fn new(code: RouteCode, payload: RouteResult, now: SystemTime) -> Self {
        Self {
            code,
            payload,
            created_at: now,
            expires_at: now + ROUTE_TTL,
        }
    }

    pub(crate) const fn from_parts(
        code: RouteCode,
        payload: RouteResult,
        created_at: SystemTime,
        expires_at: SystemTime,
    ) -> Self {
        Self {
            code,
            payload,
            created_at,
            expires_at,
        }
    }

    /// Code the route is stored under.
    #[must_use]
    pub const fn code(&self) -> &RouteCode {
        &self.code
    }

    /// The stored result.
    #[must_use]
    pub const fn payload(&self) -> &RouteResult {
        &self.payload
    }

    /// When the route was written.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// When the route stops being retrievable.
    #[must_use]
    pub const fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// Whether the route is no longer retrievable at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }

    /// Take the stored result.
    #[must_use]
    pub fn into_payload(self) -> RouteResult {
        self.payload
    }
}

/// Which kind of backend a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Survives process restarts.
    Persistent,
    /// Lost when the process exits.
    InMemory,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Persistent => "persistent",
            Self::InMemory => "in-memory",
        })
    }
}

/// Time-to-live storage for assembled routes.
///
/// Every entry is independent, so implementations must tolerate concurrent
/// calls on different codes without coordination. Expired entries read as
/// absent whether or not a sweep has removed them yet.
///
/// # Examples
/// ```
/// use roundtrip_core::{MemoryRouteStore, RouteCode, RouteStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryRouteStore::new();
/// let code = RouteCode::parse("AB12CD34")?;
/// assert_eq!(store.get(&code)?, None);
/// store.delete(&code)?;
/// # Ok(())
/// # }
/// ```
pub trait RouteStore: Send + Sync {
    /// The backend behind this store.
    fn kind(&self) -> BackendKind;

    /// Current time according to the store's clock.
    fn now(&self) -> SystemTime;

    /// Store `payload` under `code` for [`ROUTE_TTL`] from now.
    ///
    /// An expired entry under the same code is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CodeInUse`] when a live route already has the
    /// code, or a backend error when the write fails.
    fn put(&self, code: &RouteCode, payload: RouteResult) -> Result<StoredRoute, StorageError>;

    /// Fetch the full record for `code` if it has not expired.
    ///
    /// An expired record is deleted before returning `None`.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the read or the lazy delete fails.
    fn get_record(&self, code: &RouteCode) -> Result<Option<StoredRoute>, StorageError>;

    /// Fetch the payload for `code` if it has not expired.
    ///
    /// # Errors
    ///
    /// See [`RouteStore::get_record`].
    fn get(&self, code: &RouteCode) -> Result<Option<RouteResult>, StorageError> {
        Ok(self.get_record(code)?.map(StoredRoute::into_payload))
    }

    /// Remove `code`. Removing a missing code succeeds.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the delete fails.
    fn delete(&self, code: &RouteCode) -> Result<(), StorageError>;

    /// Codes whose expiry is strictly before `now`, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the scan cannot run.
    fn expired_codes(&self, now: SystemTime) -> Result<Vec<RouteCode>, StorageError>;

    /// Delete `codes` as a single unit, returning how many entries went.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the batch does not commit; none of its
    /// deletions apply.
    fn delete_batch(&self, codes: &[RouteCode]) -> Result<usize, StorageError>;

    /// Purge every expired entry in batches of [`SWEEP_BATCH_LIMIT`].
    ///
    /// # Errors
    ///
    /// Fails only when the initial scan fails; batch failures are counted in
    /// the report.
    fn sweep(&self) -> Result<SweepReport, StorageError> {
        sweep_expired(self, self.now(), SWEEP_BATCH_LIMIT)
    }
}

macro_rules! forward_route_store {
    ($pointer:ident) => {
        impl<T: RouteStore + ?Sized> RouteStore for $pointer<T> {
            fn kind(&self) -> BackendKind {
                (**self).kind()
            }

            fn now(&self) -> SystemTime {
                (**self).now()
            }

            fn put(
                &self,
                code: &RouteCode,
                payload: RouteResult,
            ) -> Result<StoredRoute, StorageError> {
                (**self).put(code, payload)
            }

            fn get_record(&self, code: &RouteCode) -> Result<Option<StoredRoute>, StorageError> {
                (**self).get_record(code)
            }

            fn get(&self, code: &RouteCode) -> Result<Option<RouteResult>, StorageError> {
                (**self).get(code)
            }

            fn delete(&self, code: &RouteCode) -> Result<(), StorageError> {
                (**self).delete(code)
            }

            fn expired_codes(&self, now: SystemTime) -> Result<Vec<RouteCode>, StorageError> {
                (**self).expired_codes(now)
            }

            fn delete_batch(&self, codes: &[RouteCode]) -> Result<usize, StorageError> {
                (**self).delete_batch(codes)
            }

            fn sweep(&self) -> Result<SweepReport, StorageError> {
                (**self).sweep()
            }
        }
    };
}

forward_route_store!(Box);
forward_route_store!(Arc);

/// Open the configured backend, falling back to memory.
///
/// With a `path`, a SQLite store is opened there. If that fails, or the
/// `store-sqlite` feature is disabled, a warning is logged and an in-memory
/// store is returned instead. The choice is final for the returned store.
pub fn open_route_store<C>(path: Option<&Path>, clock: C) -> Box<dyn RouteStore>
where
    C: Clock + 'static,
{
    let Some(path) = path else {
        log::info!("no route store path configured; using in-memory route store");
        return Box::new(MemoryRouteStore::with_clock(clock));
    };
    open_persistent(path, clock)
}

#[cfg(feature = "store-sqlite")]
fn open_persistent<C>(path: &Path, clock: C) -> Box<dyn RouteStore>
where
    C: Clock + 'static,
{
    let clock = Arc::new(clock);
    match SqliteRouteStore::open_with_clock(path, Arc::clone(&clock)) {
        Ok(store) => {
            log::info!("using SQLite route store at {}", path.display());
            Box::new(store)
        }
        Err(error) => {
            log::warn!("{error}; falling back to in-memory route store");
            Box::new(MemoryRouteStore::with_clock(clock))
        }
    }
}

#[cfg(not(feature = "store-sqlite"))]
fn open_persistent<C>(path: &Path, clock: C) -> Box<dyn RouteStore>
where
    C: Clock + 'static,
{
    log::warn!(
        "route store path {} ignored: built without the store-sqlite feature; using in-memory route store",
        path.display()
    );
    Box::new(MemoryRouteStore::with_clock(clock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, sample_route};
    use rstest::rstest;

    #[rstest]
    fn stored_route_expires_after_ttl() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let code = RouteCode::parse("AAAA0000").expect("code");
        let record = StoredRoute::new(code, sample_route(), now);

        assert!(!record.is_expired_at(now + ROUTE_TTL - Duration::from_millis(1)));
        assert!(record.is_expired_at(now + ROUTE_TTL));
    }

    #[rstest]
    fn no_path_opens_memory_store() {
        let store = open_route_store(None, ManualClock::default());
        assert_eq!(store.kind(), BackendKind::InMemory);
    }

    #[cfg(feature = "store-sqlite")]
    #[rstest]
    fn unopenable_path_falls_back_to_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("routes.db");
        let store = open_route_store(Some(&path), ManualClock::default());
        assert_eq!(store.kind(), BackendKind::InMemory);
    }

    #[cfg(feature = "store-sqlite")]
    #[rstest]
    fn valid_path_opens_sqlite_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routes.db");
        let store = open_route_store(Some(&path), ManualClock::default());
        assert_eq!(store.kind(), BackendKind::Persistent);
    }
}
