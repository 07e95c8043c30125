/*!
 * Core Module
 * Queue implementations, configuration and error handling
 */

pub mod config;
pub mod data_structures;
pub mod errors;
pub mod sync;

// Re-export for convenience
pub use config::RingQueueConfig;
pub use data_structures::{RingQueue, TwoStageQueue};
pub use errors::*;
pub use sync::{LockFreeQueue, QueueStats};
