//! Fixed-capacity ring buffer for request records.
//!
//! Concurrent appends are synchronized; readers take a point-in-time
//! snapshot so aggregate statistics are never computed over an in-flight
//! append.

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Fixed-capacity FIFO buffer that evicts the oldest entry on overflow.
#[derive(Debug)]
pub struct RingBuffer<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a buffer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when at capacity.
    pub fn push(&self, item: T) {
        let mut inner = self.inner.lock();
        if inner.len() == self.capacity {
            inner.pop_front();
        }
        inner.push_back(item);
    }

    /// Clone the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().iter().cloned().collect()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the buffer holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_push_below_capacity_keeps_all() {
        let ring = RingBuffer::new(4);
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.snapshot(), vec![1, 2]);
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_overflow_evicts_exactly_the_oldest() {
        let ring = RingBuffer::new(1000);
        for i in 0..1000 {
            ring.push(i);
        }
        assert_eq!(ring.len(), 1000);

        ring.push(1000);

        let snapshot = ring.snapshot();
        assert_eq!(snapshot.len(), 1000);
        assert_eq!(snapshot[0], 1); // record 0 evicted
        assert_eq!(*snapshot.last().unwrap(), 1000);
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let ring = RingBuffer::new(3);
        for i in 0..50 {
            ring.push(i);
            assert!(ring.len() <= 3);
        }
        assert_eq!(ring.snapshot(), vec![47, 48, 49]);
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let ring = RingBuffer::new(0);
        ring.push("a");
        ring.push("b");
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_concurrent_appends_lose_no_updates() {
        let ring = Arc::new(RingBuffer::new(10_000));
        let mut handles = Vec::new();
        for t in 0..8 {
            let ring = Arc::clone(&ring);
            handles.push(std::thread::spawn(move || {
                for i in 0..1000 {
                    ring.push(t * 1000 + i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(ring.len(), 8000);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_pushes() {
        let ring = RingBuffer::new(10);
        ring.push(1);
        let snapshot = ring.snapshot();
        ring.push(2);
        assert_eq!(snapshot, vec![1]);
        assert_eq!(ring.snapshot(), vec![1, 2]);
    }
}
