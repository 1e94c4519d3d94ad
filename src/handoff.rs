//! Bounded single-producer/single-consumer handoff of owned buffers.
//!
//! The producer claims a spare buffer, fills it and pushes it; the consumer
//! pops it, reads it and recycles it back to the spare list. Buffers move by
//! value so each one has exactly one owner at any time. Both lists are
//! lock-free, so neither side ever waits on the other.

use crossbeam::queue::ArrayQueue;
use std::fmt;

pub struct HandoffQueue<T> {
    ready: ArrayQueue<T>,
    spare: ArrayQueue<T>,
}

impl<T> HandoffQueue<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "HandoffQueue capacity must be greater than zero");
        Self {
            ready: ArrayQueue::new(capacity),
            spare: ArrayQueue::new(capacity),
        }
    }

    /// Queue whose spare list starts out holding `spares`.
    pub fn with_spares<I>(capacity: usize, spares: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let queue = Self::new(capacity);
        for item in spares {
            assert!(
                queue.spare.push(item).is_ok(),
                "HandoffQueue cannot hold more spares than its capacity"
            );
        }
        queue
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ready.capacity()
    }

    /// Number of pushed buffers not yet popped.
    #[inline]
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ready.is_full()
    }

    /// Enqueue without waiting for the consumer. A full queue hands the
    /// value straight back and leaves the queued entries untouched.
    #[inline]
    pub fn try_push(&self, item: T) -> Result<(), T> {
        self.ready.push(item)
    }

    /// Oldest pushed value, or `None` when nothing is ready.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        self.ready.pop()
    }

    /// Take a spare buffer for filling, if one has been recycled.
    #[inline]
    pub fn claim(&self) -> Option<T> {
        self.spare.pop()
    }

    /// Return a buffer the consumer has finished reading. Extra buffers
    /// beyond the capacity are dropped.
    pub fn recycle(&self, item: T) {
        let _ = self.spare.push(item);
    }

    pub fn spare_count(&self) -> usize {
        self.spare.len()
    }
}

impl<T> fmt::Debug for HandoffQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandoffQueue")
            .field("capacity", &self.capacity())
            .field("ready", &self.ready_count())
            .field("spare", &self.spare_count())
            .finish()
    }
}
