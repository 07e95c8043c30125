/*!
 * Ring-Buffer Queue
 * Growable FIFO ring guarded by a single reader/writer lock
 */

use crate::core::config::RingQueueConfig;
use crate::core::errors::{QueueError, QueueResult};
use parking_lot::RwLock;
use std::fmt;
use tracing::debug;

struct RingBuffer<T> {
    buf: Vec<Option<T>>,
    head: usize,
    tail: usize,
    count: usize,
    min_capacity: usize,
}

impl<T> RingBuffer<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: empty_slots(capacity),
            head: 0,
            tail: 0,
            count: 0,
            min_capacity: capacity,
        }
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.buf.len() - 1
    }

    #[inline(always)]
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) & self.mask()
    }

    /// Reallocate to exactly twice the current contents
    ///
    /// Grows when full, shrinks when a quarter full.
    fn resize(&mut self) {
        let old_capacity = self.buf.len();
        let mut new_buf = empty_slots(self.count << 1);

        for (i, dst) in new_buf.iter_mut().take(self.count).enumerate() {
            let src = self.slot(i);
            *dst = self.buf[src].take();
        }

        self.head = 0;
        self.tail = self.count;
        self.buf = new_buf;

        debug!(
            old_capacity,
            new_capacity = self.buf.len(),
            len = self.count,
            "ring queue resized"
        );
    }

    fn push(&mut self, value: T) {
        if self.count == self.buf.len() {
            self.resize();
        }

        self.buf[self.tail] = Some(value);
        // bitwise modulus
        self.tail = (self.tail + 1) & self.mask();
        self.count += 1;
    }

    fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let value = self.buf[self.head].take();
        self.head = (self.head + 1) & self.mask();
        self.count -= 1;

        if self.buf.len() > self.min_capacity && (self.count << 2) == self.buf.len() {
            self.resize();
        }

        value
    }

    fn get(&self, offset: usize) -> Option<&T> {
        if offset >= self.count {
            return None;
        }
        self.buf[self.slot(offset)].as_ref()
    }
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<T>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// Thread-safe FIFO ring buffer with indexed access
///
/// Every operation takes the lock, so this is the simple alternative to
/// [`LockFreeQueue`](crate::LockFreeQueue) when callers also need `peek`,
/// `get` or `len`.
///
/// # Performance
///
/// - **push/pop**: O(1) amortized; capacity doubles when full and halves when
///   a quarter full, never dropping below the configured minimum
/// - **len/peek/get**: shared read lock, O(1)
/// - **index_of**: shared read lock, O(n)
pub struct RingQueue<T> {
    inner: RwLock<RingBuffer<T>>,
}

impl<T> RingQueue<T> {
    /// Create an empty queue with the default minimum capacity
    pub fn new() -> Self {
        let config = RingQueueConfig::default();
        Self {
            inner: RwLock::new(RingBuffer::with_capacity(config.min_capacity)),
        }
    }

    /// Create an empty queue with a validated configuration
    pub fn with_config(config: RingQueueConfig) -> QueueResult<Self> {
        config.validate()?;
        Ok(Self {
            inner: RwLock::new(RingBuffer::with_capacity(config.min_capacity)),
        })
    }

    /// Number of queued elements
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.read().count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current buffer capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.read().buf.len()
    }

    /// Append a value at the back
    pub fn push(&self, value: T) {
        self.inner.write().push(value);
    }

    /// Remove the front value, or `None` if empty
    pub fn pop(&self) -> Option<T> {
        self.inner.write().pop()
    }

    /// Clone of the front value
    pub fn peek(&self) -> QueueResult<T>
    where
        T: Clone,
    {
        self.inner.read().get(0).cloned().ok_or(QueueError::Empty)
    }

    /// Clone of the element at `index`
    ///
    /// Negative indices count from the back: 0 is the front, -1 the last.
    pub fn get(&self, index: isize) -> QueueResult<T>
    where
        T: Clone,
    {
        let ring = self.inner.read();
        let len = ring.count;
        let offset = if index < 0 {
            index.checked_add(len as isize)
        } else {
            Some(index)
        };

        offset
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| ring.get(i))
            .cloned()
            .ok_or(QueueError::IndexOutOfRange { index, len })
    }

    /// Position from the front of the first element equal to `value`
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let ring = self.inner.read();
        (0..ring.count).find(|&i| ring.get(i) == Some(value))
    }
}

impl<T> Default for RingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ring = self.inner.read();
        f.debug_struct("RingQueue")
            .field("len", &ring.count)
            .field("capacity", &ring.buf.len())
            .finish()
    }
}
