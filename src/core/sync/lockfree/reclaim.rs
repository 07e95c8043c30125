/*!
 * Node Reclamation
 * Epoch-based deferred freeing of unlinked queue nodes
 *
 * # Design
 *
 * A consumer that loses the race on `head` may still be holding a pointer to
 * the sentinel another consumer just unlinked. Freeing that node immediately
 * would turn the loser's next dereference into a use-after-free, and handing
 * its memory to a fresh push would let a stale CAS succeed (ABA).
 *
 * Every queue operation therefore runs inside a pinned epoch:
 *
 * 1. `pin()` announces the thread as active in the current global epoch
 * 2. Pointers loaded from the queue are only dereferenced while pinned
 * 3. An unlinked node goes to `retire()`, which queues it as garbage
 * 4. Garbage is freed once every thread pinned at retirement has unpinned
 *
 * Since no pinned thread can see a node's memory reused, pointer equality in
 * a CAS always means the same live node.
 *
 * # Performance
 *
 * - **pin**: thread-local counter bump, no shared writes in the common case
 * - **retire**: pushes onto a thread-local bag, flushed in batches
 */

use super::node::Node;
use crossbeam_epoch::{self as epoch, Guard, Shared};

/// Enter a reclamation critical section for one queue operation
#[inline(always)]
pub(crate) fn pin() -> Guard {
    epoch::pin()
}

/// Hand an unlinked node over for deferred destruction
///
/// The node's payload is not dropped; see [`Node`].
///
/// # Safety
///
/// `node` must already be unreachable from the queue's `head` and `tail`
/// cursors, so no thread pinning after this call can load it, and it must be
/// retired exactly once.
#[inline]
pub(crate) unsafe fn retire<T>(guard: &Guard, node: Shared<'_, Node<T>>) {
    guard.defer_destroy(node);
}

/// Guard that frees retired nodes immediately
///
/// # Safety
///
/// Only valid when the caller has exclusive access to the queue (construction
/// and `Drop`), so no other thread can hold a reference into the chain.
#[inline]
pub(crate) unsafe fn exclusive() -> &'static Guard {
    epoch::unprotected()
}

/// Push this thread's pending garbage to the global collector
///
/// Useful after a burst of pops on a thread that is about to go idle; freed
/// memory otherwise stays in the thread-local bag until the next operations
/// on that thread fill it.
pub fn flush() {
    pin().flush();
}
