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

use std::hash::Hash;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Error;
use crate::hash::HashFamily;
use crate::hash::MERSENNE_PRIME_61;

const MAX_TABLE_ENTRIES: usize = 1 << 30;

/// Count-Min frequency table for estimating key counts.
///
/// A `d × w` grid of `u64` counters with one pairwise independent hash
/// function per row. Estimates never undercount, and with probability at
/// least `1 - delta` they overcount by at most `epsilon * total_weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    num_hashes: usize,
    num_buckets: usize,
    total_weight: u64,
    counts: Vec<u64>,
    family: HashFamily,
}

impl FrequencyTable {
    /// Creates a table for the given failure probability and relative error,
    /// drawing hash parameters from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `delta` or `epsilon` is not in the open interval `(0, 1)`, or the
    /// resulting grid would be too large.
    pub fn new(delta: f64, epsilon: f64) -> Result<Self, Error> {
        Self::with_rng(delta, epsilon, &mut rand::rng())
    }

    /// Creates a table whose hash parameters are drawn from a `StdRng` seeded
    /// with `seed`.
    ///
    /// Tables built with the same parameters and seed are mergeable.
    pub fn with_seed(delta: f64, epsilon: f64, seed: u64) -> Result<Self, Error> {
        Self::with_rng(delta, epsilon, &mut StdRng::seed_from_u64(seed))
    }

    /// Creates a table whose hash parameters are drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        delta: f64,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let num_hashes = Self::suggest_num_hashes(delta)?;
        let num_buckets = Self::suggest_num_buckets(epsilon)?;
        check_table_size(num_hashes, num_buckets)?;
        let family = HashFamily::generate(num_hashes, num_buckets, MERSENNE_PRIME_61, rng)?;
        Ok(Self::make(family))
    }

    /// Creates a table around an existing hash family.
    ///
    /// The number of rows and columns are taken from the family.
    pub fn from_family(family: HashFamily) -> Result<Self, Error> {
        check_table_size(family.len(), family.width())?;
        Ok(Self::make(family))
    }

    /// Suggests the number of buckets (`w = ceil(e / epsilon)`) for a relative error.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `epsilon` is not in `(0, 1)`.
    pub fn suggest_num_buckets(epsilon: f64) -> Result<usize, Error> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(Error::out_of_open_unit_interval("epsilon", epsilon));
        }
        let buckets = (std::f64::consts::E / epsilon).ceil();
        if buckets >= MAX_TABLE_ENTRIES as f64 {
            return Err(
                Error::invalid_parameter("epsilon is too small for a bounded table")
                    .with_context("epsilon", epsilon),
            );
        }
        Ok(buckets as usize)
    }

    /// Suggests the number of hash functions (`d = ceil(ln(1 / delta))`) for a
    /// failure probability.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `delta` is not in `(0, 1)`.
    pub fn suggest_num_hashes(delta: f64) -> Result<usize, Error> {
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::out_of_open_unit_interval("delta", delta));
        }
        let hashes = (1.0 / delta).ln().ceil();
        Ok((hashes as usize).max(1))
    }

    /// Returns the number of hash functions (rows).
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Returns the number of buckets per row.
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// Returns the hash family used to address the grid.
    pub fn hash_family(&self) -> &HashFamily {
        &self.family
    }

    /// Returns the sum of all increments applied.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns true if the table has not seen any updates.
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Returns the relative error (epsilon) implied by the number of buckets.
    pub fn relative_error(&self) -> f64 {
        std::f64::consts::E / self.num_buckets as f64
    }

    /// Returns the confidence (`1 - delta`) implied by the number of hashes.
    pub fn confidence(&self) -> f64 {
        1.0 - (-(self.num_hashes as f64)).exp()
    }

    /// Adds one occurrence of `item`.
    ///
    /// Counters saturate at `u64::MAX`, which unit increments cannot reach in
    /// practice.
    pub fn update<T: Hash + ?Sized>(&mut self, item: &T) {
        self.total_weight = self.total_weight.saturating_add(1);
        let num_buckets = self.num_buckets;
        for (row, column) in self.family.columns(item).enumerate() {
            let index = row * num_buckets + column;
            self.counts[index] = self.counts[index].saturating_add(1);
        }
    }

    /// Adds `weight` occurrences of `item`. A weight of zero is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CounterOverflow`](crate::error::ErrorKind::CounterOverflow)
    /// if the total weight, and with it possibly a counter, would exceed
    /// `u64::MAX`. The table is unchanged in that case.
    pub fn update_with_weight<T: Hash + ?Sized>(
        &mut self,
        item: &T,
        weight: u64,
    ) -> Result<(), Error> {
        if weight == 0 {
            return Ok(());
        }
        // Every counter is at most the total weight, so checking the total
        // covers every counter touched below.
        let total_weight = self.total_weight.checked_add(weight).ok_or_else(|| {
            Error::counter_overflow("total weight exceeds u64::MAX").with_context("weight", weight)
        })?;
        let num_buckets = self.num_buckets;
        for (row, column) in self.family.columns(item).enumerate() {
            self.counts[row * num_buckets + column] += weight;
        }
        self.total_weight = total_weight;
        Ok(())
    }

    /// Returns the estimated count of `item`: the minimum of its counters.
    pub fn estimate<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        self.indices(item)
            .map(|index| self.counts[index])
            .min()
            .unwrap_or(0)
    }

    /// Returns an upper bound on the true count of `item`.
    ///
    /// Count-Min never undercounts, so this is the estimate itself.
    pub fn upper_bound<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        self.estimate(item)
    }

    /// Returns a lower bound on the true count of `item` that holds with
    /// probability [`confidence`](Self::confidence).
    pub fn lower_bound<T: Hash + ?Sized>(&self, item: &T) -> u64 {
        let error = (self.relative_error() * self.total_weight as f64) as u64;
        self.estimate(item).saturating_sub(error)
    }

    /// Merges another table into this one by adding counters pointwise.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::IncompatibleSketch`](crate::error::ErrorKind::IncompatibleSketch)
    /// if the tables differ in shape or hash parameters, and
    /// [`ErrorKind::CounterOverflow`](crate::error::ErrorKind::CounterOverflow)
    /// if the merged total weight overflows. The table is unchanged on error.
    pub fn merge(&mut self, other: &FrequencyTable) -> Result<(), Error> {
        if self.num_hashes != other.num_hashes || self.num_buckets != other.num_buckets {
            return Err(Error::incompatible("tables have different dimensions")
                .with_context("left", format!("{}x{}", self.num_hashes, self.num_buckets))
                .with_context("right", format!("{}x{}", other.num_hashes, other.num_buckets)));
        }
        if self.family != other.family {
            return Err(Error::incompatible("tables have different hash parameters"));
        }
        let total_weight = self
            .total_weight
            .checked_add(other.total_weight)
            .ok_or_else(|| Error::counter_overflow("merged total weight exceeds u64::MAX"))?;
        for (dst, src) in self.counts.iter_mut().zip(other.counts.iter()) {
            *dst += *src;
        }
        self.total_weight = total_weight;
        tracing::debug!(
            num_hashes = self.num_hashes,
            num_buckets = self.num_buckets,
            total_weight = self.total_weight,
            "merged frequency table"
        );
        Ok(())
    }

    /// Zeroes every counter, keeping the hash parameters.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.total_weight = 0;
    }

    fn make(family: HashFamily) -> Self {
        let num_hashes = family.len();
        let num_buckets = family.width();
        tracing::debug!(num_hashes, num_buckets, "created frequency table");
        FrequencyTable {
            num_hashes,
            num_buckets,
            total_weight: 0,
            counts: vec![0u64; num_hashes * num_buckets],
            family,
        }
    }

    fn indices<T: Hash + ?Sized>(&self, item: &T) -> impl Iterator<Item = usize> {
        let num_buckets = self.num_buckets;
        self.family
            .columns(item)
            .enumerate()
            .map(move |(row, column)| row * num_buckets + column)
    }
}

fn check_table_size(num_hashes: usize, num_buckets: usize) -> Result<(), Error> {
    let entries = num_hashes
        .checked_mul(num_buckets)
        .filter(|entries| *entries < MAX_TABLE_ENTRIES);
    if entries.is_none() {
        return Err(Error::invalid_parameter(format!(
            "num_hashes * num_buckets must be < {MAX_TABLE_ENTRIES}"
        ))
        .with_context("num_hashes", num_hashes)
        .with_context("num_buckets", num_buckets));
    }
    Ok(())
}
