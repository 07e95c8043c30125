/*!
 * Lock-Free Queue Contention Tests
 * Many producers and consumers on one queue: no loss, no duplication, order
 */

use lockfree_queue::LockFreeQueue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serial_test::serial;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const PRODUCERS: usize = 10;
const PUSHES: u64 = 500_000;

/// K producers each push 0..P; a single-threaded drain sees each value K times
#[test]
#[serial]
fn test_concurrent_pushes_then_drain() {
    let queue = Arc::new(LockFreeQueue::new());

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..PUSHES {
                    queue.push(i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut counts = vec![0usize; PUSHES as usize];
    let mut total = 0usize;
    while let Some(v) = queue.pop() {
        counts[v as usize] += 1;
        total += 1;
    }

    assert_eq!(total, PRODUCERS * PUSHES as usize);
    for (value, &count) in counts.iter().enumerate() {
        assert_eq!(count, PRODUCERS, "value {} seen {} times", value, count);
    }
}

/// Values from one producer come out in the order that producer pushed them
#[test]
#[serial]
fn test_per_producer_order() {
    let producers = 4u64;
    let per_producer = 50_000u64;
    let consumers = 4;

    let queue = Arc::new(LockFreeQueue::new());
    let done = Arc::new(AtomicBool::new(false));

    let producer_handles: Vec<_> = (0..producers)
        .map(|p| {
            let queue = queue.clone();
            thread::spawn(move || {
                for seq in 0..per_producer {
                    queue.push((p, seq));
                }
            })
        })
        .collect();

    let consumer_handles: Vec<_> = (0..consumers)
        .map(|_| {
            let queue = queue.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut last_seen: HashMap<u64, u64> = HashMap::new();
                let mut popped = 0u64;
                loop {
                    // Read the flag before popping so an empty result after
                    // it means every push has already landed
                    let finished = done.load(Ordering::SeqCst);
                    match queue.pop() {
                        Some((p, seq)) => {
                            if let Some(&prev) = last_seen.get(&p) {
                                assert!(seq > prev, "producer {} reordered: {} after {}", p, seq, prev);
                            }
                            last_seen.insert(p, seq);
                            popped += 1;
                        }
                        None if finished => break,
                        None => thread::yield_now(),
                    }
                }
                popped
            })
        })
        .collect();

    for handle in producer_handles {
        handle.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);

    let popped: u64 = consumer_handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(popped, producers * per_producer);
    assert_eq!(queue.pop(), None);
}

/// Producers and consumers running together for a while, then a final drain
#[test]
#[serial]
fn test_sustained_push_pop() {
    let queue = Arc::new(LockFreeQueue::new());
    let stop = Arc::new(AtomicBool::new(false));
    let pushed = Arc::new(AtomicU64::new(0));
    let limit = 1_000_000u64;

    let producers: Vec<_> = (0..4)
        .map(|t| {
            let queue = queue.clone();
            let stop = stop.clone();
            let pushed = pushed.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                let mut i = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    queue.push(rng.gen_range(0..limit));
                    i += 1;
                }
                pushed.fetch_add(i, Ordering::SeqCst);
            })
        })
        .collect();

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = queue.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut popped = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    if let Some(v) = queue.pop() {
                        assert!(v < limit, "popped value {} was never pushed", v);
                        popped += 1;
                    }
                }
                popped
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(500));
    stop.store(true, Ordering::SeqCst);

    for handle in producers {
        handle.join().unwrap();
    }
    let mut popped: u64 = consumers.into_iter().map(|h| h.join().unwrap()).sum();

    while let Some(v) = queue.pop() {
        assert!(v < limit);
        popped += 1;
    }

    assert_eq!(popped, pushed.load(Ordering::SeqCst));
}

/// Phases from the reference run: push-only, pop-only, then mixed
#[test]
#[serial]
fn test_three_phase_run() {
    let threads = 8;
    let per_thread = 20_000u64;
    let queue = Arc::new(LockFreeQueue::new());

    let spawn_producers = |queue: &Arc<LockFreeQueue<u64>>| -> Vec<_> {
        (0..threads)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..per_thread {
                        queue.push(i);
                    }
                })
            })
            .collect()
    };

    for handle in spawn_producers(&queue) {
        handle.join().unwrap();
    }

    // Every pop must succeed while the queue still holds values
    let poppers: Vec<_> = (0..threads)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                for _ in 0..per_thread {
                    assert!(queue.pop().is_some(), "pop failed on a non-empty queue");
                }
            })
        })
        .collect();
    for handle in poppers {
        handle.join().unwrap();
    }
    assert_eq!(queue.pop(), None);

    let producers = spawn_producers(&queue);
    let consumers: Vec<_> = (0..threads)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                (0..per_thread * 2)
                    .filter_map(|_| queue.pop())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    let mut observed: Vec<u64> = consumers
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    observed.extend(std::iter::from_fn(|| queue.pop()));

    observed.sort_unstable();
    let expected: Vec<u64> = (0..per_thread)
        .flat_map(|i| std::iter::repeat(i).take(threads))
        .collect();
    assert_eq!(observed, expected);
}
