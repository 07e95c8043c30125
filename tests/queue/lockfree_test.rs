/*!
 * Lock-Free Queue Tests
 * Single-threaded contract: FIFO order, empty handling, payload drops
 */

use lockfree_queue::{reclaim, LockFreeQueue};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_pop_on_fresh_queue() {
    let queue: LockFreeQueue<i32> = LockFreeQueue::new();
    assert_eq!(queue.pop(), None);
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_single_push_pop_then_empty() {
    let queue = LockFreeQueue::default();
    queue.push(100);
    assert_eq!(queue.pop(), Some(100));
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_spsc_fifo() {
    let queue = LockFreeQueue::new();
    queue.push(1);
    queue.push(2);
    queue.push(3);

    let popped: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(popped, vec![1, 2, 3]);
}

#[test]
fn test_interleaved_push_pop() {
    let queue = LockFreeQueue::new();
    let mut expected_next = 0;

    for round in 0..100 {
        for i in 0..3 {
            queue.push(round * 3 + i);
        }
        for _ in 0..2 {
            assert_eq!(queue.pop(), Some(expected_next));
            expected_next += 1;
        }
    }

    while let Some(v) = queue.pop() {
        assert_eq!(v, expected_next);
        expected_next += 1;
    }
    assert_eq!(expected_next, 300);
}

#[test]
fn test_owned_payloads() {
    let queue = LockFreeQueue::new();
    queue.push(String::from("first"));
    queue.push(String::from("second"));

    assert_eq!(queue.pop().as_deref(), Some("first"));
    assert_eq!(queue.pop().as_deref(), Some("second"));
    assert_eq!(queue.pop(), None);
}

#[test]
fn test_zero_sized_payload() {
    let queue = LockFreeQueue::new();
    for _ in 0..10 {
        queue.push(());
    }
    assert_eq!(std::iter::from_fn(|| queue.pop()).count(), 10);
}

struct Tracked {
    drops: Arc<AtomicUsize>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_drop_queue_with_remaining_values() {
    let drops = Arc::new(AtomicUsize::new(0));
    {
        let queue = LockFreeQueue::new();
        for _ in 0..100 {
            queue.push(Tracked {
                drops: drops.clone(),
            });
        }
        for _ in 0..30 {
            queue.pop();
        }
        assert_eq!(drops.load(Ordering::SeqCst), 30);
    }
    reclaim::flush();
    assert_eq!(drops.load(Ordering::SeqCst), 100);
}

#[test]
fn test_drop_empty_queue() {
    let drops = Arc::new(AtomicUsize::new(0));
    let queue = LockFreeQueue::new();
    queue.push(Tracked {
        drops: drops.clone(),
    });
    drop(queue.pop());
    drop(queue);
    reclaim::flush();
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_debug_output() {
    let queue: LockFreeQueue<u8> = LockFreeQueue::new();
    let debug = format!("{:?}", queue);
    assert!(debug.starts_with("LockFreeQueue"));
}
