/*!
 * Stress Harness
 * Multi-threaded push/pop verification run for the lock-free queue
 *
 * Three phases against one shared queue:
 * 1. All producers push `0..items` concurrently
 * 2. All consumers pop everything back concurrently; every pop must succeed
 * 3. Producers push again while consumers pop, then the queue is drained
 *
 * Phase 3 passes when every value in `0..items` was observed exactly
 * `producers` times and nothing else was observed.
 */

use crate::core::errors::{QueueError, QueueResult};
use crate::core::sync::{LockFreeQueue, QueueStats};
use crate::monitoring::span_phase;
use serde::{Deserialize, Serialize};
use std::thread;
use tracing::{error, info};

/// Stress run parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressConfig {
    /// Producer threads
    pub producers: usize,
    /// Consumer threads
    pub consumers: usize,
    /// Values `0..items_per_producer` pushed by each producer per phase
    pub items_per_producer: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            producers: 10,
            consumers: 10,
            items_per_producer: 500_000,
        }
    }
}

impl StressConfig {
    /// Small run for tests and smoke checks
    pub const fn quick() -> Self {
        Self {
            producers: 4,
            consumers: 4,
            items_per_producer: 5_000,
        }
    }

    /// Defaults overridden by LFQ_PRODUCERS, LFQ_CONSUMERS and LFQ_ITEMS
    pub fn from_env() -> QueueResult<Self> {
        let defaults = Self::default();
        let config = Self {
            producers: env_or("LFQ_PRODUCERS", defaults.producers)?,
            consumers: env_or("LFQ_CONSUMERS", defaults.consumers)?,
            items_per_producer: env_or("LFQ_ITEMS", defaults.items_per_producer)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QueueResult<()> {
        if self.producers == 0 || self.consumers == 0 || self.items_per_producer == 0 {
            return Err(QueueError::Config(format!(
                "producers, consumers and items must be positive (got {}, {}, {})",
                self.producers, self.consumers, self.items_per_producer
            )));
        }
        Ok(())
    }

    fn total_items(&self) -> u64 {
        self.producers as u64 * self.items_per_producer
    }
}

fn env_or<T>(key: &str, default: T) -> QueueResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| QueueError::Config(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

/// Outcome of a successful stress run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressReport {
    pub config: StressConfig,
    pub pushed: u64,
    pub popped: u64,
    pub stats: QueueStats,
}

/// Run all three phases, failing on the first lost, duplicated or foreign value
pub fn run(config: &StressConfig) -> QueueResult<StressReport> {
    config.validate()?;
    info!(
        producers = config.producers,
        consumers = config.consumers,
        items = config.items_per_producer,
        "stress run starting"
    );

    let queue = LockFreeQueue::new();
    let total = config.total_items();

    {
        let phase = span_phase("push_only");
        push_all(&queue, config);
        phase.record_items_processed(total);
    }

    {
        let phase = span_phase("pop_only");
        let popped = pop_exact(&queue, config.consumers, total);
        phase.record_items_processed(popped);
        phase.record_result(popped == total);
        if popped != total {
            error!(expected = total, popped, "pop failed on a non-empty queue");
            return Err(QueueError::VerificationFailed(format!(
                "pop phase observed an empty queue after {} of {} values",
                popped, total
            )));
        }
    }

    let observed = {
        let phase = span_phase("push_and_pop");
        let mut observed = push_while_popping(&queue, config);
        while let Some(v) = queue.pop() {
            observed.push(v);
        }
        phase.record_items_processed(observed.len() as u64);
        observed
    };

    let check = span_phase("verify");
    let verdict = verify(&observed, config);
    check.record_result(verdict.is_ok());
    verdict?;

    Ok(StressReport {
        config: *config,
        pushed: total * 2,
        popped: total + observed.len() as u64,
        stats: queue.stats(),
    })
}

fn push_all(queue: &LockFreeQueue<u64>, config: &StressConfig) {
    thread::scope(|s| {
        for _ in 0..config.producers {
            s.spawn(|| {
                for i in 0..config.items_per_producer {
                    queue.push(i);
                }
            });
        }
    });
}

/// Pop `total` values split across `consumers` threads, counting successes
fn pop_exact(queue: &LockFreeQueue<u64>, consumers: usize, total: u64) -> u64 {
    let share = total / consumers as u64;
    let remainder = total % consumers as u64;

    thread::scope(|s| {
        let handles: Vec<_> = (0..consumers as u64)
            .map(|c| {
                let quota = share + u64::from(c < remainder);
                s.spawn(move || (0..quota).filter(|_| queue.pop().is_some()).count() as u64)
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(0))
            .sum()
    })
}

fn push_while_popping(queue: &LockFreeQueue<u64>, config: &StressConfig) -> Vec<u64> {
    // Each consumer makes twice as many attempts as one producer pushes
    let attempts = config.items_per_producer * 2;

    thread::scope(|s| {
        for _ in 0..config.producers {
            s.spawn(|| {
                for i in 0..config.items_per_producer {
                    queue.push(i);
                }
            });
        }

        let consumers: Vec<_> = (0..config.consumers)
            .map(|_| s.spawn(move || (0..attempts).filter_map(|_| queue.pop()).collect::<Vec<_>>()))
            .collect();

        consumers
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_default())
            .collect()
    })
}

/// Every value in `0..items` exactly `producers` times, nothing else
fn verify(observed: &[u64], config: &StressConfig) -> QueueResult<()> {
    let mut counts = vec![0usize; config.items_per_producer as usize];

    for &v in observed {
        match counts.get_mut(v as usize) {
            Some(c) => *c += 1,
            None => {
                return Err(QueueError::VerificationFailed(format!(
                    "observed value {} that was never pushed",
                    v
                )))
            }
        }
    }

    if let Some((value, &count)) = counts
        .iter()
        .enumerate()
        .find(|(_, c)| **c != config.producers)
    {
        error!(value, count, expected = config.producers, "verification failed");
        return Err(QueueError::VerificationFailed(format!(
            "value {} observed {} times, expected {}",
            value, count, config.producers
        )));
    }

    info!(values = observed.len(), "verification passed");
    Ok(())
}
