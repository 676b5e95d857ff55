//! Process-local route store used when no database is available.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use super::{BackendKind, RouteCode, RouteStore, StorageError, StoredRoute};
use crate::{Clock, RouteResult, SystemClock};

/// In-memory [`RouteStore`].
///
/// Behaves exactly like the persistent backend except that entries are lost
/// when the process exits.
#[derive(Debug)]
pub struct MemoryRouteStore<C = SystemClock> {
    entries: Mutex<HashMap<RouteCode, StoredRoute>>,
    clock: C,
}

impl MemoryRouteStore<SystemClock> {
    /// Empty store reading the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryRouteStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryRouteStore<C> {
    /// Empty store reading `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries held, including expired ones not yet removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Whether the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Poisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<RouteCode, StoredRoute>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl<C: Clock> RouteStore for MemoryRouteStore<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::InMemory
    }

    fn now(&self) -> SystemTime {
        self.clock.now()
    }

    fn put(&self, code: &RouteCode, payload: RouteResult) -> Result<StoredRoute, StorageError> {
        let now = self.clock.now();
        let mut entries = self.lock()?;
        if entries
            .get(code)
            .is_some_and(|existing| !existing.is_expired_at(now))
        {
            return Err(StorageError::CodeInUse { code: code.clone() });
        }
        let record = StoredRoute::new(code.clone(), payload, now);
        entries.insert(code.clone(), record.clone());
        Ok(record)
    }

    fn get_record(&self, code: &RouteCode) -> Result<Option<StoredRoute>, StorageError> {
        let now = self.clock.now();
        let mut entries = self.lock()?;
        let Some(record) = entries.get(code) else {
            return Ok(None);
        };
        if !record.is_expired_at(now) {
            return Ok(Some(record.clone()));
        }
        entries.remove(code);
        Ok(None)
    }

    fn delete(&self, code: &RouteCode) -> Result<(), StorageError> {
        self.lock()?.remove(code);
        Ok(())
    }

    fn expired_codes(&self, now: SystemTime) -> Result<Vec<RouteCode>, StorageError> {
        let mut codes: Vec<RouteCode> = self
            .lock()?
            .values()
            .filter(|record| record.expires_at() < now)
            .map(|record| record.code().clone())
            .collect();
        codes.sort_unstable();
        Ok(codes)
    }

    fn delete_batch(&self, codes: &[RouteCode]) -> Result<usize, StorageError> {
        let mut entries = self.lock()?;
        Ok(codes
            .iter()
            .filter(|code| entries.remove(*code).is_some())
            .count())
    }
}
