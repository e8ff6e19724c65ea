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

//! Count-Min frequency table for approximate key counts.
//!
//! The table is a `d × w` grid of counters, where `w = ceil(e / epsilon)` and
//! `d = ceil(ln(1 / delta))`. Each row owns one pairwise independent hash
//! function (see [`crate::hash`]). An update adds to one counter per row; an
//! estimate is the smallest of those counters, so it never undercounts and,
//! with probability at least `1 - delta`, overcounts by no more than
//! `epsilon` times the total weight.
//!
//! Tables with identical dimensions and hash parameters can be merged by
//! adding their grids pointwise, which allows sharded ingestion with a final
//! reduce.
//!
//! # Usage
//!
//! ```rust
//! # use heavyhitters::countmin::FrequencyTable;
//! let mut table = FrequencyTable::new(0.001, 0.01).unwrap();
//! table.update("#rust");
//! table.update_with_weight("#sketch", 3).unwrap();
//! assert!(table.estimate("#sketch") >= 3);
//! ```
//!
//! # Merging Shards
//!
//! ```rust
//! # use heavyhitters::countmin::FrequencyTable;
//! let mut left = FrequencyTable::with_seed(0.01, 0.01, 42).unwrap();
//! let mut right = FrequencyTable::with_seed(0.01, 0.01, 42).unwrap();
//! left.update("a");
//! right.update("a");
//! left.merge(&right).unwrap();
//! assert!(left.estimate("a") >= 2);
//! ```

mod sketch;
pub use self::sketch::FrequencyTable;
