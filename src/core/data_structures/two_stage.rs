/*!
 * Two-Stage Queue
 * Single-threaded amortized FIFO built from two buffers
 *
 * The queue is split into a head stage (`head[head_pos..]`) and a tail
 * stage. Popping advances `head_pos`; pushing appends to `tail`. When the
 * head stage runs dry the stages swap, and the spent head buffer is reused as
 * the new tail, so steady-state operation does not allocate.
 */

/// Non-concurrent FIFO queue with O(1) push and pop
#[derive(Debug)]
pub struct TwoStageQueue<T> {
    head: Vec<Option<T>>,
    head_pos: usize,
    tail: Vec<Option<T>>,
}

impl<T> TwoStageQueue<T> {
    pub fn new() -> Self {
        Self {
            head: Vec::new(),
            head_pos: 0,
            tail: Vec::new(),
        }
    }

    /// Number of queued elements
    #[inline]
    pub fn len(&self) -> usize {
        self.head.len() - self.head_pos + self.tail.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a value at the back
    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.tail.push(Some(value));
    }

    /// Remove and return the front value
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head_pos >= self.head.len() {
            if self.tail.is_empty() {
                return None;
            }
            // Pick up tail as new head, recycle the spent head as tail
            std::mem::swap(&mut self.head, &mut self.tail);
            self.tail.clear();
            self.head_pos = 0;
        }

        let value = self.head[self.head_pos].take();
        self.head_pos += 1;
        value
    }

    /// Borrow the front value without removing it
    pub fn peek_front(&self) -> Option<&T> {
        if self.head_pos < self.head.len() {
            return self.head[self.head_pos].as_ref();
        }
        self.tail.first().and_then(Option::as_ref)
    }

    /// Pop from the front while `pred` holds for the front element
    ///
    /// Returns whether anything was removed.
    pub fn clean_front_while<F>(&mut self, mut pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let mut cleaned = false;
        while self.peek_front().is_some_and(&mut pred) {
            self.pop_front();
            cleaned = true;
        }
        cleaned
    }

    /// Pop every element, reporting whether anything was removed
    pub fn clean_front(&mut self) -> bool {
        self.clean_front_while(|_| true)
    }
}

impl<T> Default for TwoStageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for TwoStageQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tail.extend(iter.into_iter().map(Some));
    }
}
