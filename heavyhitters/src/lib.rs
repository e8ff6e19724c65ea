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

//! # heavyhitters
//!
//! Approximate frequency counting and top-k tracking for streams of discrete
//! keys, in memory that does not grow with the number of distinct keys.
//!
//! The crate is built bottom-up from three pieces:
//!
//! * [`hash`]: a pairwise independent family of multiplicative-congruential
//!   hash functions.
//! * [`countmin`]: a Count-Min frequency table that answers point estimates
//!   with one-sided error.
//! * [`topk`]: a tracker that keeps the k heaviest keys up to date on every
//!   observation.
//!
//! All structures are single-writer: mutation takes `&mut self`. Tables with
//! identical parameters can be merged for sharded ingestion.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod countmin;
pub mod error;
pub mod hash;
pub mod topk;
