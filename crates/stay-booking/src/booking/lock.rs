use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Serialization point for every write that claims calendar days.
///
/// Waiters are granted the lock in the order they asked for it. Clones share the same
/// underlying lock, so one inventory means one `ReservationLock`.
#[derive(Debug, Clone, Default)]
pub struct ReservationLock {
    inner: Arc<Mutex<()>>,
}

/// Held for the duration of a reservation; released on drop.
pub type ReservationGuard<'a> = MutexGuard<'a, ()>;

impl ReservationLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait (without timeout) for exclusive access.
    pub async fn acquire(&self) -> ReservationGuard<'_> {
        self.inner.lock().await
    }

    /// Non-blocking probe, mostly useful for asserting nobody holds the lock.
    pub fn try_acquire(&self) -> Option<ReservationGuard<'_>> {
        self.inner.try_lock().ok()
    }
}
