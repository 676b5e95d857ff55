//! Time source used by route stores.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::SystemTime;

/// Supplies the current wall-clock time.
///
/// Stores read time through this seam so expiry can be tested without
/// sleeping.
pub trait Clock: Send + Sync + Debug {
    /// The current instant.
    fn now(&self) -> SystemTime;
}

/// [`Clock`] backed by [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}
