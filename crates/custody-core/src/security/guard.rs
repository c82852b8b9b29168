//! Reentrancy guard.
//!
//! A single execution lane per service instance. Calls from other threads
//! queue on the lane, which gives mutations a total order. A call from the
//! thread that already holds the lane (an external callback re-entering the
//! service) sees the in-flight flag and is refused with `Reentrancy`; the
//! outer call is unaffected.

use crate::domain::{CustodyError, CustodyResult};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::Cell;
use tracing::warn;

/// Mutual-exclusion flag with guaranteed release.
#[derive(Default)]
pub struct ReentrancyGuard {
    lane: ReentrantMutex<Cell<bool>>,
}

/// Held for the duration of a guarded operation. Dropping it releases the
/// flag on every exit path.
pub struct GuardToken<'a> {
    lane: ReentrantMutexGuard<'a, Cell<bool>>,
}

impl ReentrancyGuard {
    /// Create an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lane for `operation`.
    pub fn enter(&self, operation: &'static str) -> CustodyResult<GuardToken<'_>> {
        let lane = self.lane.lock();
        if lane.get() {
            warn!(operation, "[custody] reentrant call rejected");
            return Err(CustodyError::Reentrancy { operation });
        }
        lane.set(true);
        Ok(GuardToken { lane })
    }

    /// Whether the lane is busy. From a thread other than the holder this
    /// reports contention on the lane, not the in-flight flag itself.
    #[cfg(test)]
    fn is_entered(&self) -> bool {
        self.lane.try_lock().map(|lane| lane.get()).unwrap_or(true)
    }
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.lane.set(false);
    }
}
