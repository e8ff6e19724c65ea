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

use std::fmt;
use std::hash::Hash;

use crate::countmin::FrequencyTable;
use crate::error::Error;
use crate::topk::TopKTrackerBuilder;
use crate::topk::heap::IndexedMinHeap;
use crate::topk::heap::PushPop;

/// Candidate slots reserved up front; larger sets grow on demand.
const MAX_INITIAL_CAPACITY: usize = 1024;

/// Result row for top-k queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<T> {
    item: T,
    estimate: u64,
}

impl<T> Row<T> {
    /// Returns the key.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Returns the estimated count cached for the key.
    pub fn estimate(&self) -> u64 {
        self.estimate
    }

    /// Splits the row into `(item, estimate)`.
    pub fn into_parts(self) -> (T, u64) {
        (self.item, self.estimate)
    }
}

impl<T: fmt::Display> fmt::Display for Row<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item, self.estimate)
    }
}

/// Incremental tracker of the k most frequent keys in a stream.
///
/// Each [`observe`](Self::observe) updates a Count-Min [`FrequencyTable`] and
/// reconciles a bounded candidate set against the key's fresh estimate. The
/// candidate set never holds more than `k` keys.
///
/// See [`crate::topk`] for the admission policy and tie-breaking rules.
#[derive(Debug, Clone)]
pub struct TopKTracker<T> {
    k: usize,
    table: FrequencyTable,
    candidates: IndexedMinHeap<T>,
}

impl<T: Hash + Eq + Ord + Clone> TopKTracker<T> {
    /// Creates a tracker for the `k` most frequent keys, with hash parameters
    /// drawn from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `k` is zero or `delta`/`epsilon` is not in `(0, 1)`.
    pub fn new(delta: f64, epsilon: f64, k: usize) -> Result<Self, Error> {
        TopKTrackerBuilder::new(k)
            .delta(delta)
            .epsilon(epsilon)
            .build()
    }

    /// Creates a tracker whose hash parameters are drawn from a seeded RNG.
    pub fn with_seed(delta: f64, epsilon: f64, k: usize, seed: u64) -> Result<Self, Error> {
        TopKTrackerBuilder::new(k)
            .delta(delta)
            .epsilon(epsilon)
            .seed(seed)
            .build()
    }

    /// Creates a tracker around an existing, possibly non-empty, table.
    ///
    /// The candidate set starts empty and fills from subsequent observations.
    pub fn with_table(table: FrequencyTable, k: usize) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::invalid_parameter("k must be at least 1"));
        }
        tracing::debug!(
            k,
            num_hashes = table.num_hashes(),
            num_buckets = table.num_buckets(),
            "created top-k tracker"
        );
        Ok(Self {
            k,
            table,
            candidates: IndexedMinHeap::with_capacity(k.min(MAX_INITIAL_CAPACITY)),
        })
    }

    /// Returns the maximum number of candidates.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the current number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if nothing has been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.candidates.len() == 0
    }

    /// Returns true if `item` is currently a candidate.
    pub fn contains(&self, item: &T) -> bool {
        self.candidates.contains(item)
    }

    /// Returns the estimate cached for a candidate, or `None` for non-members.
    pub fn cached_estimate(&self, item: &T) -> Option<u64> {
        self.candidates.get(item)
    }

    /// Returns the live table estimate for any key, candidate or not.
    pub fn estimate<Q: Hash + ?Sized>(&self, item: &Q) -> u64 {
        self.table.estimate(item)
    }

    /// Returns the number of observations so far.
    pub fn total_weight(&self) -> u64 {
        self.table.total_weight()
    }

    /// Returns the underlying frequency table.
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Records one occurrence of `item`.
    pub fn observe(&mut self, item: T) {
        self.table.update(&item);
        let estimate = self.table.estimate(&item);
        self.offer(item, estimate);
    }

    /// Records `weight` occurrences of `item` at once.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CounterOverflow`](crate::error::ErrorKind::CounterOverflow)
    /// if the table cannot absorb `weight`; nothing changes in that case.
    pub fn observe_with_weight(&mut self, item: T, weight: u64) -> Result<(), Error> {
        if weight == 0 {
            return Ok(());
        }
        self.table.update_with_weight(&item, weight)?;
        let estimate = self.table.estimate(&item);
        self.offer(item, estimate);
        Ok(())
    }

    /// Returns the candidates by descending estimate, ties by ascending key.
    pub fn snapshot(&self) -> Vec<Row<T>> {
        let mut rows: Vec<Row<T>> = self
            .candidates
            .iter()
            .map(|(item, estimate)| Row {
                item: item.clone(),
                estimate,
            })
            .collect();
        rows.sort_by(|a, b| b.estimate.cmp(&a.estimate).then_with(|| a.item.cmp(&b.item)));
        rows
    }

    /// Consumes the tracker and returns its candidates in snapshot order.
    pub fn into_sorted_vec(mut self) -> Vec<Row<T>> {
        let mut rows = Vec::with_capacity(self.candidates.len());
        while let Some((item, estimate)) = self.candidates.pop_min() {
            rows.push(Row { item, estimate });
        }
        rows.reverse();
        rows
    }

    /// Merges another tracker into this one.
    ///
    /// The tables are merged pointwise, then the candidate set is rebuilt by
    /// offering the union of both candidate sets, in ascending key order, with
    /// estimates from the merged table.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleSketch`](crate::error::ErrorKind::IncompatibleSketch)
    /// if `k` or the table parameters differ, and
    /// [`ErrorKind::CounterOverflow`](crate::error::ErrorKind::CounterOverflow)
    /// if the merged counters overflow. The tracker is unchanged on error.
    pub fn merge(&mut self, other: &TopKTracker<T>) -> Result<(), Error> {
        if self.k != other.k {
            return Err(Error::incompatible("trackers have different k")
                .with_context("left", self.k)
                .with_context("right", other.k));
        }
        self.table.merge(&other.table)?;

        let mut keys: Vec<T> = self
            .candidates
            .iter()
            .chain(other.candidates.iter())
            .map(|(item, _)| item.clone())
            .collect();
        keys.sort();
        keys.dedup();

        self.candidates.clear();
        for item in keys {
            let estimate = self.table.estimate(&item);
            self.offer(item, estimate);
        }
        tracing::debug!(
            k = self.k,
            candidates = self.candidates.len(),
            total_weight = self.table.total_weight(),
            "merged top-k tracker"
        );
        Ok(())
    }

    /// Clears the table and the candidate set, keeping hash parameters.
    pub fn reset(&mut self) {
        self.table.reset();
        self.candidates.clear();
        tracing::debug!(k = self.k, "reset top-k tracker");
    }

    fn offer(&mut self, item: T, estimate: u64) {
        if self.candidates.update(&item, estimate) {
            return;
        }
        if self.candidates.len() < self.k {
            self.candidates.insert_or_update(item, estimate);
            return;
        }
        match self.candidates.peek_min() {
            Some((_, min)) if estimate >= min => {}
            _ => return,
        }
        match self.candidates.push_pop(item, estimate) {
            PushPop::Evicted(evicted_estimate) => {
                tracing::trace!(estimate, evicted_estimate, "admitted key, evicted minimum");
            }
            PushPop::Rejected => {
                tracing::trace!(estimate, "key tied the minimum and lost the tie-break");
            }
        }
    }
}
