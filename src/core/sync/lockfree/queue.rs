/*!
 * Lock-Free MPMC Queue
 * Unbounded FIFO queue on a sentinel-anchored linked list
 *
 * # Algorithm
 *
 * `head` points at the sentinel (the most recently consumed node) and the
 * front element lives in `head.next`. `tail` points at the last node or one
 * step behind it.
 *
 * **Push** (linearizes at the successor CAS):
 * 1. Allocate a node
 * 2. If `tail.next` is already set, swing `tail` forward and retry
 * 3. CAS `tail.next` from null to the new node, retry from 2 on failure
 * 4. CAS `tail` onto the new node; failure means someone helped already
 *
 * **Pop** (linearizes at the head CAS):
 * 1. Load `head` and `head.next`; a null successor means empty
 * 2. If `tail == head`, swing `tail` forward first and retry
 * 3. CAS `head` onto the successor, retry from 1 on failure
 * 4. Move the payload out of the new sentinel and retire the old one
 *
 * Step 2 of pop keeps `tail` strictly ahead of any node being retired, so a
 * producer pinning later can never load a pointer into reclaimed memory.
 */

use super::node::Node;
use super::reclaim;
use super::stats::{QueueStats, StatsCounters};
use crossbeam_epoch::{Atomic, Guard, Shared};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::Ordering;
use tracing::trace;

/// Queue cursor on its own cache line
#[repr(align(128))]
struct Cursor<T>(Atomic<Node<T>>);

impl<T> Deref for Cursor<T> {
    type Target = Atomic<Node<T>>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Unbounded multi-producer multi-consumer lock-free queue
///
/// # Performance
///
/// - **Push**: one allocation plus two CAS in the uncontended case
/// - **Pop**: two loads plus one CAS; the freed node is reclaimed in batches
/// - **Contention**: retries the CAS loop, never blocks or parks
///
/// # Example
///
/// ```
/// use lockfree_queue::LockFreeQueue;
///
/// let queue = LockFreeQueue::new();
/// queue.push(100);
/// assert_eq!(queue.pop(), Some(100));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct LockFreeQueue<T> {
    head: Cursor<T>,
    tail: Cursor<T>,
    stats: StatsCounters,
}

// Safety: values are moved in and out whole, never shared between threads,
// and every node access goes through atomics under an epoch guard.
unsafe impl<T: Send> Send for LockFreeQueue<T> {}
unsafe impl<T: Send> Sync for LockFreeQueue<T> {}

impl<T> LockFreeQueue<T> {
    /// Create an empty queue with a fresh sentinel
    pub fn new() -> Self {
        let queue = Self {
            head: Cursor(Atomic::null()),
            tail: Cursor(Atomic::null()),
            stats: StatsCounters::default(),
        };

        // Safety: nothing else can reach the queue before `new` returns.
        unsafe {
            let guard = reclaim::exclusive();
            let sentinel = Node::sentinel().into_shared(guard);
            queue.head.store(sentinel, Ordering::SeqCst);
            queue.tail.store(sentinel, Ordering::SeqCst);
        }

        queue
    }

    /// Append a value at the back (lock-free, never fails)
    pub fn push(&self, value: T) {
        let guard = &reclaim::pin();
        let mut node = Node::with_value(value);

        loop {
            let tail = self.tail.load(Ordering::SeqCst, guard);
            // Safety: `tail` is never null and never behind a retired node
            // while we are pinned (see pop step 2).
            let tail_ref = unsafe { tail.deref() };
            let next = tail_ref.next.load(Ordering::SeqCst, guard);

            if !next.is_null() {
                // Tail is lagging: help the stalled producer and retry
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                    guard,
                );
                self.stats.record_retry();
                continue;
            }

            match tail_ref.next.compare_exchange(
                Shared::null(),
                node,
                Ordering::SeqCst,
                Ordering::SeqCst,
                guard,
            ) {
                Ok(linked) => {
                    let _ = self.tail.compare_exchange(
                        tail,
                        linked,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                        guard,
                    );
                    self.stats.record_push();
                    return;
                }
                Err(err) => {
                    // Lost the race for this tail; take the node back
                    node = err.new;
                    self.stats.record_retry();
                }
            }
        }
    }

    /// Remove the front value, or `None` if the queue is empty (lock-free)
    ///
    /// An empty result is a normal outcome, never an error.
    pub fn pop(&self) -> Option<T> {
        let guard = &reclaim::pin();
        self.pop_with(guard)
    }

    fn pop_with(&self, guard: &Guard) -> Option<T> {
        loop {
            let head = self.head.load(Ordering::SeqCst, guard);
            // Safety: `head` is never null and cannot be freed while pinned.
            let next = unsafe { head.deref() }.next.load(Ordering::SeqCst, guard);

            // Safety: a linked successor is live for the guard's lifetime.
            let next_ref = match unsafe { next.as_ref() } {
                Some(node) => node,
                None => {
                    self.stats.record_empty_pop();
                    return None;
                }
            };

            let tail = self.tail.load(Ordering::SeqCst, guard);
            if tail == head {
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                    guard,
                );
                self.stats.record_retry();
                continue;
            }

            if self
                .head
                .compare_exchange(head, next, Ordering::SeqCst, Ordering::SeqCst, guard)
                .is_ok()
            {
                // Safety: winning the head CAS makes us the only reader of
                // `next`'s payload, and `head` is now unreachable from both
                // cursors (tail is already past it).
                unsafe {
                    let value = next_ref.take();
                    reclaim::retire(guard, head);
                    self.stats.record_pop();
                    return Some(value);
                }
            }

            self.stats.record_retry();
        }
    }

    /// Snapshot of operation counters (zeroed without the `stats` feature)
    pub fn stats(&self) -> QueueStats {
        self.stats.snapshot()
    }

    /// Approximate number of queued elements, from the counters
    ///
    /// Exact when no push or pop is in flight. Always 0 without the `stats`
    /// feature.
    #[inline]
    pub fn len_hint(&self) -> u64 {
        self.stats().len_hint()
    }
}

impl<T> Default for LockFreeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LockFreeQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeQueue")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for LockFreeQueue<T> {
    fn drop(&mut self) {
        // Safety: `&mut self` means no other thread holds a guard-protected
        // pointer into this chain, so immediate frees are sound.
        unsafe {
            let guard = reclaim::exclusive();

            let mut drained = 0usize;
            while let Some(value) = self.pop_with(guard) {
                drop(value);
                drained += 1;
            }

            let sentinel = self.head.load(Ordering::SeqCst, guard);
            drop(sentinel.into_owned());

            trace!(drained, "lock-free queue dropped");
        }
    }
}
