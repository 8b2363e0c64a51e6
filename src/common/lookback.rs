// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Bounded trailing window over the most recently processed items.
//!
//! A single buffer is owned by the seeker and shared (read-only) by every
//! execution state. Insertion is at the tail; once the configured capacity
//! is exceeded the oldest item is evicted from the head, so the contents are
//! always the last `min(capacity, processed)` items in arrival order.
//!
//! Capacity 0 is legal and yields a buffer that is always empty.
//!
//! The buffer is internal to the seeker. Evaluators read the window through
//! [`LookbackBuffer::as_slice`]; the returned slice borrows the buffer, so it
//! cannot observe a later push. Callers of the seeker get an owned
//! [`LookbackBuffer::snapshot`].

use std::collections::VecDeque;

use crate::common::item::Item;

/// Upper bound on the slots reserved up front; larger windows grow on demand.
const MAX_PREALLOCATED: usize = 4_096;

/// Fixed-capacity FIFO of [`Item`]s.
#[derive(Debug, Clone)]
pub struct LookbackBuffer<T> {
    items: VecDeque<Item<T>>,
    capacity: usize,
}

impl<T> LookbackBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` items.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            // One extra slot: push appends before evicting.
            items: VecDeque::with_capacity(capacity.min(MAX_PREALLOCATED) + 1),
            capacity,
        }
    }

    /// Maximum number of items retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Appends `item`, evicting the oldest entry if the capacity is exceeded.
    ///
    /// Returns the evicted item, if any. With capacity 0 the pushed item
    /// itself is returned and the buffer stays empty.
    pub fn push(&mut self, item: Item<T>) -> Option<Item<T>> {
        if self.capacity == 0 {
            return Some(item);
        }
        self.items.push_back(item);
        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// Undoes the most recent [`push`](Self::push), given what it returned.
    ///
    /// Used when a step fails and must leave the seeker as it found it.
    pub fn rollback(&mut self, evicted: Option<Item<T>>) {
        if self.capacity == 0 {
            return;
        }
        self.items.pop_back();
        if let Some(item) = evicted {
            self.items.push_front(item);
        }
    }

    /// Contiguous view of the window, oldest first, newest last.
    pub fn as_slice(&mut self) -> &[Item<T>] {
        self.items.make_contiguous()
    }
}

impl<T: Clone> LookbackBuffer<T> {
    /// Owned copy of the window, oldest first, newest last.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Item<T>> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(buffer: &LookbackBuffer<i32>) -> Vec<i32> {
        buffer.snapshot().iter().map(|item| item.value).collect()
    }

    #[test]
    fn test_push_within_capacity() {
        let mut buffer = LookbackBuffer::new(3);
        assert!(buffer.push(Item::new(0, 1)).is_none());
        assert!(buffer.push(Item::new(1, 2)).is_none());
        assert_eq!(values(&buffer), vec![1, 2]);
        assert_eq!(buffer.as_slice().last().map(|i| i.index), Some(1));
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut buffer = LookbackBuffer::new(2);
        buffer.push(Item::new(0, 1));
        buffer.push(Item::new(1, 2));
        let evicted = buffer.push(Item::new(2, 3));
        assert_eq!(evicted, Some(Item::new(0, 1)));
        assert_eq!(values(&buffer), vec![2, 3]);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_always_empty() {
        let mut buffer = LookbackBuffer::new(0);
        for i in 0..5 {
            let evicted = buffer.push(Item::new(i, i as i32));
            assert_eq!(evicted, Some(Item::new(i, i as i32)));
            assert_eq!(buffer.len(), 0);
        }
        assert!(buffer.as_slice().is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut buffer = LookbackBuffer::new(2);
        buffer.push(Item::new(0, 10));
        let snapshot = buffer.snapshot();
        buffer.push(Item::new(1, 11));
        buffer.push(Item::new(2, 12));
        assert_eq!(snapshot, vec![Item::new(0, 10)]);
        assert_eq!(values(&buffer), vec![11, 12]);
    }

    #[test]
    fn test_as_slice_after_wraparound() {
        let mut buffer = LookbackBuffer::new(3);
        for i in 0..7 {
            buffer.push(Item::new(i, i as i32));
        }
        let indices: Vec<u64> = buffer.as_slice().iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![4, 5, 6]);
    }

    #[test]
    fn test_rollback_restores_evicted() {
        let mut buffer = LookbackBuffer::new(2);
        buffer.push(Item::new(0, 1));
        buffer.push(Item::new(1, 2));
        let evicted = buffer.push(Item::new(2, 3));
        buffer.rollback(evicted);
        assert_eq!(values(&buffer), vec![1, 2]);
    }

    #[test]
    fn test_rollback_without_eviction() {
        let mut buffer = LookbackBuffer::new(4);
        buffer.push(Item::new(0, 1));
        let evicted = buffer.push(Item::new(1, 2));
        buffer.rollback(evicted);
        assert_eq!(values(&buffer), vec![1]);
    }

    #[test]
    fn test_rollback_zero_capacity() {
        let mut buffer = LookbackBuffer::new(0);
        let evicted = buffer.push(Item::new(0, 1));
        buffer.rollback(evicted);
        assert_eq!(buffer.len(), 0);
    }
}
