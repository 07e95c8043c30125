/*!
 * Queue Configuration
 *
 * Sizing for the ring-buffer queue
 */

use super::errors::{QueueError, QueueResult};
use serde::{Deserialize, Serialize};

/// Smallest capacity a ring queue may shrink to by default
///
/// Must be a power of two for bitwise modulus: x % n == x & (n - 1).
pub const DEFAULT_MIN_CAPACITY: usize = 16;

/// Ring-buffer queue configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingQueueConfig {
    /// Initial capacity and floor for shrinking (power of two, >= 2)
    pub min_capacity: usize,
}

impl Default for RingQueueConfig {
    fn default() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl RingQueueConfig {
    /// Configuration for many small, short-lived queues
    pub const fn compact() -> Self {
        Self { min_capacity: 2 }
    }

    /// Configuration for queues expected to hold thousands of elements
    pub const fn high_throughput() -> Self {
        Self { min_capacity: 1024 }
    }

    /// Check that the capacity floor is usable with mask-based indexing
    pub fn validate(&self) -> QueueResult<()> {
        if self.min_capacity < 2 || !self.min_capacity.is_power_of_two() {
            return Err(QueueError::InvalidCapacity(self.min_capacity));
        }
        Ok(())
    }
}
