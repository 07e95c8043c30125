/*!
 * Lock-Free Synchronization Primitives
 *
 * Unbounded MPMC queue with epoch-based memory reclamation:
 * - Sentinel-anchored linked list with CAS-advanced cursors
 * - Helping tail advance so a stalled producer never blocks others
 * - Deferred node freeing via crossbeam-epoch
 */

mod node;
mod queue;
pub mod reclaim;
mod stats;

// Re-export public API
pub use queue::LockFreeQueue;
pub use stats::QueueStats;
