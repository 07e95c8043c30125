/*!
 * Data Structures
 *
 * Queues sharing the push/pop vocabulary of the lock-free queue but built
 * for different callers:
 * - Ring-buffer queue behind a reader/writer lock, with indexed access
 * - Two-stage queue for single-threaded callers
 *
 * # Performance
 *
 * - Ring queue: amortized O(1) with doubling/halving resize
 * - Two-stage queue: O(1) push/pop, no locking, buffer reuse on stage swap
 */

mod ring_queue;
mod two_stage;

pub use ring_queue::RingQueue;
pub use two_stage::TwoStageQueue;
