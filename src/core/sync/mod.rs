/*!
 * Synchronization Primitives
 *
 * Concurrent queue building blocks:
 * - Lock-free MPMC queue for the many-producer hot path
 * - Epoch-based reclamation backing it
 *
 * # Performance
 *
 * - No locks on push or pop, contention resolved by CAS retry
 * - Head, tail and counters on separate cache lines to prevent false sharing
 */

pub mod lockfree;

pub use lockfree::{LockFreeQueue, QueueStats};
