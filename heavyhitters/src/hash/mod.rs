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

//! Pairwise independent hashing of stream keys onto counter columns.
//!
//! Hashing happens in two stages. A key is first reduced to an integer in
//! `[0, P)` with a stable byte hash (XXH3-64 over the bytes the key feeds to
//! [`std::hash::Hasher`]). That value is then mapped onto a column with a
//! multiplicative-congruential function `((a * x + b) mod P) mod w`, where
//! `a` and `b` are drawn uniformly from `[0, P)`. Functions drawn this way
//! form a 2-wise independent family over `[0, P)`, which is what the
//! Count-Min error bound relies on.
//!
//! # Usage
//!
//! ```rust
//! # use heavyhitters::hash::HashFamily;
//! # use heavyhitters::hash::MERSENNE_PRIME_61;
//! # use rand::SeedableRng;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let family = HashFamily::generate(4, 100, MERSENNE_PRIME_61, &mut rng).unwrap();
//! for column in family.columns("#rust") {
//!     assert!(column < 100);
//! }
//! ```

use std::hash::Hash;
use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

mod family;
pub use self::family::HashFamily;
pub use self::family::HashFunction;

/// The Mersenne prime `2^61 - 1`, the default modulus of the hash family.
///
/// Any reduced key is below this value, and `a * x + b` for operands below
/// it always fits in 128 bits.
pub const MERSENNE_PRIME_61: u64 = (1 << 61) - 1;

/// Reduces `item` to a domain value in `[0, prime)`.
///
/// The reduction is stable: the same key always maps to the same value, in
/// this process and any other built from the same toolchain.
///
/// # Panics
///
/// Panics if `prime` is zero.
pub fn reduce_key<T: Hash + ?Sized>(item: &T, prime: u64) -> u64 {
    let mut hasher = Xxh3::new();
    item.hash(&mut hasher);
    hasher.finish() % prime
}
