//! Bounded snapshot history for undo

use std::collections::VecDeque;
use village_core::constants::HISTORY_CAPACITY;

/// Stack of full snapshots, newest on top.
///
/// Pushing onto a full history drops the oldest snapshot.
#[derive(Debug, Clone)]
pub struct UndoHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> UndoHistory<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a snapshot taken before a mutation
    pub fn push(&mut self, snapshot: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Take the most recent snapshot
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_is_lifo() {
        let mut history = UndoHistory::default();
        history.push(1);
        history.push(2);
        assert_eq!(history.pop(), Some(2));
        assert_eq!(history.pop(), Some(1));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = UndoHistory::default();
        for i in 0..21 {
            history.push(i);
        }
        assert_eq!(history.len(), 20);

        let mut last = None;
        while let Some(entry) = history.pop() {
            last = Some(entry);
        }
        // snapshot 0 was evicted by the 21st push
        assert_eq!(last, Some(1));
    }
}
