/*!
 * Lock-Free Queue Library
 * Concurrent FIFO queues with epoch-based memory reclamation
 */

pub mod core;
pub mod monitoring;
pub mod stress;

// Re-exports
pub use crate::core::sync::lockfree::reclaim;
pub use crate::core::{
    LockFreeQueue, QueueError, QueueResult, QueueStats, RingQueue, RingQueueConfig, TwoStageQueue,
};
pub use monitoring::init_tracing;
pub use stress::{StressConfig, StressReport};
