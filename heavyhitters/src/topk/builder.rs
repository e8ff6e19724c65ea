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

use super::TopKTracker;
use crate::countmin::FrequencyTable;
use crate::error::Error;

/// Default failure probability of the underlying table.
pub const DEFAULT_DELTA: f64 = 0.001;

/// Default relative error of the underlying table.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Builder for creating [`TopKTracker`] instances.
///
/// Nothing is validated until [`build()`](Self::build), which reports every
/// bad parameter as an error instead of panicking.
///
/// # Examples
///
/// ```
/// # use heavyhitters::topk::TopKTrackerBuilder;
/// let tracker = TopKTrackerBuilder::new(10)
///     .delta(0.01)
///     .epsilon(0.005)
///     .seed(42)
///     .build::<String>()
///     .unwrap();
/// assert_eq!(tracker.k(), 10);
/// assert_eq!(tracker.table().num_buckets(), 544);
/// ```
#[derive(Debug, Clone)]
pub struct TopKTrackerBuilder {
    k: usize,
    delta: f64,
    epsilon: f64,
    seed: Option<u64>,
}

impl TopKTrackerBuilder {
    /// Creates a builder tracking the `k` most frequent keys, with
    /// [`DEFAULT_DELTA`] and [`DEFAULT_EPSILON`].
    pub fn new(k: usize) -> Self {
        TopKTrackerBuilder {
            k,
            delta: DEFAULT_DELTA,
            epsilon: DEFAULT_EPSILON,
            seed: None,
        }
    }

    /// Sets the probability that an estimate exceeds its error bound.
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Sets the relative error, as a fraction of the total weight.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Draws hash parameters from an RNG seeded with `seed` instead of the
    /// thread RNG.
    ///
    /// **Important**: only trackers with identical parameters and seed can be
    /// merged.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the tracker.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `k` is zero or `delta`/`epsilon` is not in `(0, 1)`.
    pub fn build<T: Hash + Eq + Ord + Clone>(self) -> Result<TopKTracker<T>, Error> {
        if self.k == 0 {
            return Err(Error::invalid_parameter("k must be at least 1"));
        }
        let table = match self.seed {
            Some(seed) => FrequencyTable::with_seed(self.delta, self.epsilon, seed)?,
            None => FrequencyTable::new(self.delta, self.epsilon)?,
        };
        TopKTracker::with_table(table, self.k)
    }
}
