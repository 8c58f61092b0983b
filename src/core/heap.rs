//! Indexed binary max-heap with O(log n) arbitrary-position updates.
//!
//! A standard array-encoded binary heap augmented with a reverse index
//! (key → slot) so any resident item can be located, repositioned, or
//! removed in logarithmic time without a linear scan. The heap never
//! inspects item fields; ordering comes entirely from the comparator
//! supplied at construction, where `Ordering::Greater` means "closer to
//! the root".

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// One slot of the backing array: the item plus the key it is indexed under.
struct Entry<K, T> {
    key: K,
    item: T,
}

/// Binary max-heap over keyed items with a reverse index.
///
/// Items live inline in the backing `Vec`; the reverse index maps each key
/// to the slot currently holding its item. Every swap updates both sides,
/// so the array and the index are never observable in disagreement. An
/// inconsistency between them is a programming defect and trips a debug
/// assertion rather than silently corrupting ordering.
pub struct IndexedHeap<K, T, C> {
    entries: Vec<Entry<K, T>>,
    index: HashMap<K, usize>,
    cmp: C,
}

impl<K, T, C> IndexedHeap<K, T, C>
where
    K: Eq + Hash + Clone,
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty heap ordered by `cmp` (`Greater` sits closer to the root).
    pub fn new(cmp: C) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            cmp,
        }
    }

    /// Number of resident items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an item is resident under `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Borrow the item stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.get(key).map(|&slot| &self.entries[slot].item)
    }

    /// Mutably borrow the item stored under `key`.
    ///
    /// If the mutation changes how the item compares, the caller must follow
    /// up with [`reposition`](Self::reposition) to restore the heap property.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut T>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let slot = *self.index.get(key)?;
        Some(&mut self.entries[slot].item)
    }

    /// Borrow the root item without removing it. `None` when empty.
    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|e| &e.item)
    }

    /// Mutably borrow the root item without removing it.
    ///
    /// Same contract as [`get_mut`](Self::get_mut): comparator-visible
    /// mutations require a follow-up `reposition`.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.entries.first_mut().map(|e| &mut e.item)
    }

    /// Insert `item` under `key` and sift it up. O(log n).
    ///
    /// At most one item may be resident per key; pushing a duplicate key is
    /// a caller bug.
    pub fn push(&mut self, key: K, item: T) {
        debug_assert!(!self.index.contains_key(&key), "duplicate heap key");
        let slot = self.entries.len();
        self.index.insert(key.clone(), slot);
        self.entries.push(Entry { key, item });
        self.sift_up(slot);
    }

    /// Remove and return the root item. `None` when empty. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.swap_remove(0);
        self.index.remove(&entry.key);
        if !self.entries.is_empty() {
            self.record_slot(0);
            self.sift_down(0);
        }
        Some(entry.item)
    }

    /// Remove the item under `key` from any position. `None` if absent. O(log n).
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let slot = self.index.remove(key)?;
        let entry = self.entries.swap_remove(slot);
        debug_assert!(entry.key.borrow() == key, "reverse index out of sync");
        if slot < self.entries.len() {
            // The former last element landed in the freed slot; its ordering
            // relative to its new neighbors is unknown, so try both directions.
            self.record_slot(slot);
            if self.sift_up(slot) == slot {
                self.sift_down(slot);
            }
        }
        Some(entry.item)
    }

    /// Restore the heap property for `key` after an external mutation
    /// changed how its item compares. Returns `false` if absent. O(log n).
    ///
    /// A single key change can move the item in only one direction, so
    /// attempting sift-up and falling back to sift-down is exhaustive.
    pub fn reposition<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(&slot) = self.index.get(key) else {
            return false;
        };
        debug_assert!(
            self.entries[slot].key.borrow() == key,
            "reverse index out of sync"
        );
        if self.sift_up(slot) == slot {
            self.sift_down(slot);
        }
        true
    }

    /// Point the reverse index at the entry currently in `slot`.
    fn record_slot(&mut self, slot: usize) {
        let key = self.entries[slot].key.clone();
        self.index.insert(key, slot);
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.record_slot(a);
        self.record_slot(b);
    }

    /// Move the entry at `slot` rootward while it outranks its parent.
    /// Returns the final slot.
    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if (self.cmp)(&self.entries[slot].item, &self.entries[parent].item)
                != Ordering::Greater
            {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
        slot
    }

    /// Move the entry at `slot` leafward while a child outranks it.
    /// Returns the final slot.
    fn sift_down(&mut self, mut slot: usize) -> usize {
        loop {
            let left = 2 * slot + 1;
            if left >= self.entries.len() {
                break;
            }
            let right = left + 1;
            let mut top = left;
            if right < self.entries.len()
                && (self.cmp)(&self.entries[right].item, &self.entries[left].item)
                    == Ordering::Greater
            {
                top = right;
            }
            if (self.cmp)(&self.entries[top].item, &self.entries[slot].item) != Ordering::Greater {
                break;
            }
            self.swap_slots(slot, top);
            slot = top;
        }
        slot
    }

    /// Verify that every index entry points at the slot actually holding its key.
    #[cfg(test)]
    fn assert_index_consistent(&self) {
        assert_eq!(self.index.len(), self.entries.len());
        for (slot, entry) in self.entries.iter().enumerate() {
            assert_eq!(self.index.get(&entry.key), Some(&slot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn weight_heap() -> IndexedHeap<u32, i64, fn(&i64, &i64) -> Ordering> {
        IndexedHeap::new(|a: &i64, b: &i64| a.cmp(b))
    }

    #[test]
    fn test_pop_returns_max() {
        let mut heap = weight_heap();
        for (key, weight) in [(1, 10), (2, 40), (3, 20), (4, 30)] {
            heap.push(key, weight);
        }
        assert_eq!(heap.peek(), Some(&40));
        assert_eq!(heap.pop(), Some(40));
        assert_eq!(heap.pop(), Some(30));
        assert_eq!(heap.pop(), Some(20));
        assert_eq!(heap.pop(), Some(10));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_empty_heap_is_signalled_not_fatal() {
        let mut heap = weight_heap();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.remove(&7), None);
        assert!(!heap.reposition(&7));
    }

    #[test]
    fn test_remove_from_middle() {
        let mut heap = weight_heap();
        for (key, weight) in [(1, 50), (2, 40), (3, 30), (4, 20), (5, 10)] {
            heap.push(key, weight);
        }
        assert_eq!(heap.remove(&3), Some(30));
        assert!(!heap.contains(&3));
        heap.assert_index_consistent();
        assert_eq!(heap.pop(), Some(50));
        assert_eq!(heap.pop(), Some(40));
        assert_eq!(heap.pop(), Some(20));
        assert_eq!(heap.pop(), Some(10));
    }

    #[test]
    fn test_remove_last_element_truncates() {
        let mut heap = weight_heap();
        heap.push(1, 20);
        heap.push(2, 10);
        // Key 2 sits in the last slot; removal must not disturb the root.
        assert_eq!(heap.remove(&2), Some(10));
        heap.assert_index_consistent();
        assert_eq!(heap.pop(), Some(20));
    }

    #[test]
    fn test_reposition_after_increase() {
        let mut heap = weight_heap();
        heap.push(1, 10);
        heap.push(2, 50);
        heap.push(3, 30);
        *heap.get_mut(&1).unwrap() = 99;
        assert!(heap.reposition(&1));
        heap.assert_index_consistent();
        assert_eq!(heap.pop(), Some(99));
        assert_eq!(heap.pop(), Some(50));
    }

    #[test]
    fn test_reposition_after_decrease() {
        let mut heap = weight_heap();
        heap.push(1, 50);
        heap.push(2, 40);
        heap.push(3, 30);
        *heap.get_mut(&1).unwrap() = 5;
        assert!(heap.reposition(&1));
        heap.assert_index_consistent();
        assert_eq!(heap.pop(), Some(40));
        assert_eq!(heap.pop(), Some(30));
        assert_eq!(heap.pop(), Some(5));
    }

    #[test]
    fn test_randomized_ops_keep_index_consistent() {
        let mut rng = rand::rng();
        let mut heap = weight_heap();
        let mut next_key = 0u32;
        let mut live: Vec<u32> = Vec::new();

        for _ in 0..2000 {
            match rng.random_range(0..4u8) {
                0 => {
                    heap.push(next_key, rng.random_range(-1000..1000));
                    live.push(next_key);
                    next_key += 1;
                }
                1 => {
                    if heap.pop().is_some() {
                        live.retain(|k| heap.contains(k));
                    }
                }
                2 => {
                    if !live.is_empty() {
                        let key = live[rng.random_range(0..live.len())];
                        heap.remove(&key);
                        live.retain(|k| *k != key);
                    }
                }
                _ => {
                    if !live.is_empty() {
                        let key = live[rng.random_range(0..live.len())];
                        if let Some(weight) = heap.get_mut(&key) {
                            *weight = rng.random_range(-1000..1000);
                        }
                        heap.reposition(&key);
                    }
                }
            }
            heap.assert_index_consistent();
        }

        // Remaining items must drain in non-increasing order.
        let mut previous = i64::MAX;
        while let Some(weight) = heap.pop() {
            assert!(weight <= previous);
            previous = weight;
        }
    }
}
