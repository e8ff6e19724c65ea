// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Indexed binary min-heap over `(estimate, key)` entries.
//!
//! A vector-backed binary heap paired with a map from key to heap slot. Every
//! operation updates both sides, so a key is in the map exactly when it is in
//! the heap, and the map always points at the key's current slot.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<K> {
    estimate: u64,
    item: K,
}

impl<K: Ord> Entry<K> {
    /// Heap order: lower estimates first; among equal estimates the greater
    /// key is weaker. The weakest entry is the one a snapshot lists last.
    fn weaker_than(&self, other: &Self) -> bool {
        match self.estimate.cmp(&other.estimate) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.item > other.item,
        }
    }
}

/// Outcome of [`IndexedMinHeap::push_pop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum PushPop {
    /// The new entry was admitted and the former minimum, with this estimate,
    /// left.
    Evicted(u64),
    /// The new entry was itself the weakest and was not admitted.
    Rejected,
}

#[derive(Debug, Clone)]
pub(super) struct IndexedMinHeap<K> {
    entries: Vec<Entry<K>>,
    positions: HashMap<K, usize>,
}

impl<K: Hash + Eq + Ord + Clone> IndexedMinHeap<K> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, item: &K) -> bool {
        self.positions.contains_key(item)
    }

    pub fn get(&self, item: &K) -> Option<u64> {
        self.positions
            .get(item)
            .map(|&slot| self.entries[slot].estimate)
    }

    /// Returns the weakest entry.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        self.entries
            .first()
            .map(|entry| (&entry.item, entry.estimate))
    }

    /// Sets the estimate of `item`, inserting it if absent.
    pub fn insert_or_update(&mut self, item: K, estimate: u64) {
        if let Some(&slot) = self.positions.get(&item) {
            self.entries[slot].estimate = estimate;
            self.restore(slot);
            return;
        }
        let slot = self.entries.len();
        self.positions.insert(item.clone(), slot);
        self.entries.push(Entry { estimate, item });
        self.sift_up(slot);
    }

    /// Changes the estimate of an existing key. Returns false if absent.
    pub fn update(&mut self, item: &K, estimate: u64) -> bool {
        match self.positions.get(item) {
            Some(&slot) => {
                self.entries[slot].estimate = estimate;
                self.restore(slot);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the weakest entry.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let entry = self.entries.pop()?;
        self.positions.remove(&entry.item);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.item, entry.estimate))
    }

    /// Pushes `(item, estimate)` and then pops the weakest entry.
    ///
    /// `item` must not already be present. When the new entry is itself the
    /// weakest it is dropped and the heap is left untouched.
    pub fn push_pop(&mut self, item: K, estimate: u64) -> PushPop {
        let entry = Entry { estimate, item };
        match self.entries.first() {
            Some(root) if root.weaker_than(&entry) => {}
            _ => return PushPop::Rejected,
        }
        self.positions.insert(entry.item.clone(), 0);
        let evicted = std::mem::replace(&mut self.entries[0], entry);
        self.positions.remove(&evicted.item);
        self.sift_down(0);
        PushPop::Evicted(evicted.estimate)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Iterates entries in heap order, which is not sorted.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|entry| (&entry.item, entry.estimate))
    }

    fn restore(&mut self, slot: usize) {
        if slot > 0 && self.entries[slot].weaker_than(&self.entries[(slot - 1) / 2]) {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.entries[slot].weaker_than(&self.entries[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut weakest = slot;
            if left < len && self.entries[left].weaker_than(&self.entries[weakest]) {
                weakest = left;
            }
            if right < len && self.entries[right].weaker_than(&self.entries[weakest]) {
                weakest = right;
            }
            if weakest == slot {
                break;
            }
            self.swap(slot, weakest);
            slot = weakest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(slot) = self.positions.get_mut(&self.entries[a].item) {
            *slot = a;
        }
        if let Some(slot) = self.positions.get_mut(&self.entries[b].item) {
            *slot = b;
        }
    }
}
