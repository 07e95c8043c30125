/*!
 * Queue Statistics
 * Relaxed operation counters for the lock-free queue
 */

use serde::{Deserialize, Serialize};
#[cfg(feature = "stats")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of queue activity
///
/// Counters are read independently, so a snapshot taken while other threads
/// are pushing or popping is only approximately consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Successful pushes
    pub pushes: u64,
    /// Pops that returned a value
    pub pops: u64,
    /// Pops that observed an empty queue
    pub empty_pops: u64,
    /// Failed or helping CAS iterations across push and pop
    pub cas_retries: u64,
}

impl QueueStats {
    /// Elements pushed but not yet popped
    ///
    /// Exact when the queue is quiescent.
    #[inline]
    pub fn len_hint(&self) -> u64 {
        self.pushes.saturating_sub(self.pops)
    }
}

/// Live counters, kept off the cache lines of `head` and `tail`
///
/// Compiled to no-ops without the `stats` feature.
#[repr(align(128))]
#[derive(Default)]
pub(crate) struct StatsCounters {
    #[cfg(feature = "stats")]
    pushes: AtomicU64,
    #[cfg(feature = "stats")]
    pops: AtomicU64,
    #[cfg(feature = "stats")]
    empty_pops: AtomicU64,
    #[cfg(feature = "stats")]
    cas_retries: AtomicU64,
}

#[cfg(feature = "stats")]
impl StatsCounters {
    #[inline(always)]
    pub(crate) fn record_push(&self) {
        self.pushes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_pop(&self) {
        self.pops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_empty_pop(&self) {
        self.empty_pops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn record_retry(&self) {
        self.cas_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            pushes: self.pushes.load(Ordering::Relaxed),
            pops: self.pops.load(Ordering::Relaxed),
            empty_pops: self.empty_pops.load(Ordering::Relaxed),
            cas_retries: self.cas_retries.load(Ordering::Relaxed),
        }
    }
}

#[cfg(not(feature = "stats"))]
impl StatsCounters {
    #[inline(always)]
    pub(crate) fn record_push(&self) {}

    #[inline(always)]
    pub(crate) fn record_pop(&self) {}

    #[inline(always)]
    pub(crate) fn record_empty_pop(&self) {}

    #[inline(always)]
    pub(crate) fn record_retry(&self) {}

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats::default()
    }
}
