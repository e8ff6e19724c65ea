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

//! Incremental top-k tracking over a Count-Min frequency table.
//!
//! # Overview
//!
//! [`TopKTracker`] answers "which k keys are most frequent so far?" for a
//! stream whose key cardinality is unbounded. It owns a
//! [`FrequencyTable`](crate::countmin::FrequencyTable) and a candidate set of
//! at most `k` keys, each with the estimate it had when last seen. The
//! candidate set is an indexed min-heap: a binary heap ordered by estimate plus
//! a key-to-slot map, so both membership and the weakest member are cheap.
//!
//! # Admission Policy
//!
//! Every observation updates the table, re-reads the key's estimate, and then:
//!
//! * a key already in the set has its cached estimate replaced in place;
//! * while fewer than `k` keys are held, a new key is simply inserted;
//! * otherwise a new key whose estimate is below the set's minimum is dropped,
//!   and one at or above it is pushed in while the now-weakest entry is popped.
//!
//! Each step costs `O(d)` for the estimate and `O(log k)` for the heap; the
//! table is never rescanned. A key whose estimate never beats the minimum of a
//! full set stays out even if its true count ties a member's.
//!
//! # Ordering
//!
//! Snapshots list rows by descending estimate, ties by ascending key. The heap
//! uses the mirror order, so among equal estimates the greatest key is evicted
//! first and eviction always removes the row a snapshot would list last. An
//! evicted key whose estimate later catches up re-enters through the same
//! policy.
//!
//! # Examples
//!
//! ```
//! # use heavyhitters::topk::TopKTracker;
//! let mut tracker = TopKTracker::with_seed(0.001, 0.1, 2, 7).unwrap();
//! for key in ["A", "B", "A", "C", "A", "B"] {
//!     tracker.observe(key.to_string());
//! }
//! let top: Vec<(String, u64)> = tracker
//!     .snapshot()
//!     .into_iter()
//!     .map(|row| row.into_parts())
//!     .collect();
//! assert_eq!(top, vec![("A".to_string(), 3), ("B".to_string(), 2)]);
//! ```

mod builder;
mod heap;
mod tracker;

pub use self::builder::DEFAULT_DELTA;
pub use self::builder::DEFAULT_EPSILON;
pub use self::builder::TopKTrackerBuilder;
pub use self::tracker::Row;
pub use self::tracker::TopKTracker;
