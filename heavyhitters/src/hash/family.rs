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

use crate::error::Error;
use crate::hash::reduce_key;

/// A single multiplicative-congruential hash function.
///
/// Maps a domain value `x` to `((a * x + b) mod prime) mod width`. The
/// function is a plain value: it can be copied, compared, and rebuilt from its
/// four parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashFunction {
    a: u64,
    b: u64,
    prime: u64,
    width: u64,
}

impl HashFunction {
    /// Creates a hash function from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `prime < 2`, `width` is zero, or `a` or `b` is not below `prime`.
    pub fn new(a: u64, b: u64, prime: u64, width: usize) -> Result<Self, Error> {
        if prime < 2 {
            return Err(
                Error::invalid_parameter("prime must be at least 2").with_context("prime", prime)
            );
        }
        if width == 0 {
            return Err(Error::invalid_parameter("width must be at least 1"));
        }
        if a >= prime || b >= prime {
            return Err(Error::invalid_parameter("a and b must be below prime")
                .with_context("a", a)
                .with_context("b", b)
                .with_context("prime", prime));
        }
        Ok(Self {
            a,
            b,
            prime,
            width: width as u64,
        })
    }

    fn random<R: Rng + ?Sized>(prime: u64, width: usize, rng: &mut R) -> Self {
        Self {
            a: rng.random_range(0..prime),
            b: rng.random_range(0..prime),
            prime,
            width: width as u64,
        }
    }

    /// Returns the multiplier `a`.
    pub fn a(&self) -> u64 {
        self.a
    }

    /// Returns the offset `b`.
    pub fn b(&self) -> u64 {
        self.b
    }

    /// Returns the prime modulus.
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Returns the number of columns this function maps onto.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Maps an already reduced domain value onto a column in `[0, width)`.
    #[inline]
    pub fn apply(&self, value: u64) -> usize {
        let x = value as u128 % self.prime as u128;
        let hashed = (self.a as u128 * x + self.b as u128) % self.prime as u128;
        (hashed % self.width as u128) as usize
    }

    /// Maps a key onto a column in `[0, width)`.
    pub fn bucket<T: Hash + ?Sized>(&self, item: &T) -> usize {
        self.apply(reduce_key(item, self.prime))
    }
}

/// An ordered set of independently drawn [`HashFunction`]s, one per table row.
///
/// All functions share one prime and one width, so a key is reduced once and
/// then mapped by every row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashFamily {
    functions: Vec<HashFunction>,
}

impl HashFamily {
    /// Draws `count` hash functions with `(a, b)` uniform in `[0, prime)`.
    ///
    /// Each row's parameters are drawn independently from `rng`; nothing is
    /// drawn after this call returns.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `count` or `width` is zero, or `prime` is less than 2.
    pub fn generate<R: Rng + ?Sized>(
        count: usize,
        width: usize,
        prime: u64,
        rng: &mut R,
    ) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::invalid_parameter("a hash family needs at least one function"));
        }
        if width == 0 {
            return Err(Error::invalid_parameter("width must be at least 1"));
        }
        if prime < 2 {
            return Err(
                Error::invalid_parameter("prime must be at least 2").with_context("prime", prime)
            );
        }
        let functions = (0..count)
            .map(|_| HashFunction::random(prime, width, rng))
            .collect();
        Ok(Self { functions })
    }

    /// Assembles a family from explicit functions.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `functions` is empty or the functions disagree on prime or width.
    pub fn from_functions(functions: Vec<HashFunction>) -> Result<Self, Error> {
        let Some(first) = functions.first().copied() else {
            return Err(Error::invalid_parameter(
                "a hash family needs at least one function",
            ));
        };
        for (row, function) in functions.iter().enumerate() {
            if function.prime != first.prime || function.width != first.width {
                return Err(Error::invalid_parameter(
                    "all functions in a family must share prime and width",
                )
                .with_context("row", row));
            }
        }
        Ok(Self { functions })
    }

    /// Returns the number of functions (rows).
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Always false for a constructed family; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Returns the shared width.
    pub fn width(&self) -> usize {
        self.functions[0].width()
    }

    /// Returns the shared prime.
    pub fn prime(&self) -> u64 {
        self.functions[0].prime
    }

    /// Returns the functions in row order.
    pub fn functions(&self) -> &[HashFunction] {
        &self.functions
    }

    /// Returns the column of `item` in every row, in row order.
    pub fn columns<T: Hash + ?Sized>(&self, item: &T) -> impl Iterator<Item = usize> {
        let value = reduce_key(item, self.prime());
        self.functions.iter().map(move |function| function.apply(value))
    }
}
