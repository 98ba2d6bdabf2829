//! Bounded top-K collection.
//!
//! [`TopKCollector`] keeps the `k` highest-scoring items seen so far in a
//! min-heap. Both the per-shard scan and the final merge use it, so the
//! admission rule is defined exactly once: an item enters a full collector
//! only if its score is strictly greater than the current minimum.
//!
//! Entries with equal scores compare as equal. Which of several tied items
//! survives, and their relative order in the output, is unspecified.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An item paired with its score.
#[derive(Debug, Clone)]
pub struct ScoredEntry<T> {
    pub score: f32,
    pub item: T,
}

impl<T> PartialEq for ScoredEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.score.total_cmp(&other.score) == Ordering::Equal
    }
}

impl<T> Eq for ScoredEntry<T> {}

impl<T> PartialOrd for ScoredEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScoredEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: lower scores come first
        other.score.total_cmp(&self.score)
    }
}

/// Keeps the `k` best-scoring items offered to it.
#[derive(Debug)]
pub struct TopKCollector<T> {
    capacity: usize,
    heap: BinaryHeap<ScoredEntry<T>>,
}

impl<T> TopKCollector<T> {
    /// Create a collector holding at most `k` entries.
    ///
    /// Nothing is allocated up front; `k` may exceed the number of items
    /// that will ever be offered.
    pub fn new(k: usize) -> Self {
        TopKCollector {
            capacity: k,
            heap: BinaryHeap::new(),
        }
    }

    /// Offer an item. Returns `true` if it was admitted.
    pub fn offer(&mut self, score: f32, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if self.heap.len() < self.capacity {
            self.heap.push(ScoredEntry { score, item });
            return true;
        }

        match self.threshold() {
            Some(worst) if score > worst => {
                self.heap.pop();
                self.heap.push(ScoredEntry { score, item });
                true
            }
            _ => false,
        }
    }

    /// Offer every entry from an iterator.
    pub fn extend<I: IntoIterator<Item = ScoredEntry<T>>>(&mut self, entries: I) {
        for entry in entries {
            self.offer(entry.score, entry.item);
        }
    }

    /// Lowest retained score, once the collector is full.
    pub fn threshold(&self) -> Option<f32> {
        if self.heap.len() < self.capacity {
            None
        } else {
            self.heap.peek().map(|entry| entry.score)
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Retained entries in no particular order.
    pub fn into_entries(self) -> Vec<ScoredEntry<T>> {
        self.heap.into_vec()
    }

    /// Retained entries ordered by descending score.
    pub fn into_sorted(self) -> Vec<ScoredEntry<T>> {
        // `Ord` is reversed, so ascending order is descending score.
        self.heap.into_sorted_vec()
    }
}
