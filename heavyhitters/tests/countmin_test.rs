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

mod common;

use std::collections::HashMap;

use common::zipf_stream;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use heavyhitters::countmin::FrequencyTable;
use heavyhitters::error::ErrorKind;
use heavyhitters::hash::HashFamily;
use heavyhitters::hash::HashFunction;
use heavyhitters::hash::MERSENNE_PRIME_61;

#[test]
fn test_init_defaults() {
    let table = FrequencyTable::with_seed(0.05, 0.5, 9001).unwrap();
    assert_eq!(table.num_hashes(), 3);
    assert_eq!(table.num_buckets(), 6);
    assert_eq!(table.hash_family().len(), 3);
    assert!(table.is_empty());
    assert_eq!(table.total_weight(), 0);
    assert_eq!(table.estimate("missing"), 0);
}

#[test]
fn test_parameter_suggestions() {
    assert_eq!(FrequencyTable::suggest_num_buckets(0.2).unwrap(), 14);
    assert_eq!(FrequencyTable::suggest_num_buckets(0.1).unwrap(), 28);
    assert_eq!(FrequencyTable::suggest_num_buckets(0.05).unwrap(), 55);
    assert_eq!(FrequencyTable::suggest_num_buckets(0.01).unwrap(), 272);
    assert_eq!(FrequencyTable::suggest_num_buckets(0.9).unwrap(), 4);

    assert_eq!(FrequencyTable::suggest_num_hashes(0.317310508).unwrap(), 2);
    assert_eq!(FrequencyTable::suggest_num_hashes(0.045500264).unwrap(), 4);
    assert_eq!(FrequencyTable::suggest_num_hashes(0.002699796).unwrap(), 6);
    assert_eq!(FrequencyTable::suggest_num_hashes(0.001).unwrap(), 7);
    assert_eq!(FrequencyTable::suggest_num_hashes(0.9).unwrap(), 1);

    let table = FrequencyTable::with_seed(0.01, 0.1, 1).unwrap();
    assert!(table.relative_error() <= 0.1);
    assert!(table.confidence() >= 0.99);
}

#[test]
fn test_invalid_parameters() {
    let cases = [
        (0.0, 0.5),
        (1.0, 0.5),
        (-0.5, 0.5),
        (f64::NAN, 0.5),
        (0.5, 0.0),
        (0.5, -0.1),
        (0.5, 1.0),
        (0.5, 1.5),
        (0.5, f64::NAN),
        // Valid interval, but the grid would not fit in memory.
        (0.5, 1e-12),
    ];
    for (delta, epsilon) in cases {
        let err = FrequencyTable::new(delta, epsilon).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{delta}, {epsilon}");
    }
    assert!(FrequencyTable::new(0.5, 0.5).is_ok());
}

#[test]
fn test_update_and_bounds() {
    let mut table = FrequencyTable::with_seed(0.01, 0.02, 123).unwrap();
    table.update("x");
    table.update_with_weight("x", 9).unwrap();
    assert_eq!(table.estimate("x"), 10);
    assert_eq!(table.total_weight(), 10);
    let estimate = table.estimate("x");
    let upper = table.upper_bound("x");
    let lower = table.lower_bound("x");
    assert!(lower <= estimate);
    assert!(estimate <= upper);
}

#[test]
fn test_zero_weight_is_noop() {
    let mut table = FrequencyTable::with_seed(0.01, 0.02, 123).unwrap();
    table.update_with_weight("x", 0).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.estimate("x"), 0);
}

#[test]
fn test_counter_overflow() {
    let mut table = FrequencyTable::with_seed(0.1, 0.1, 5).unwrap();
    table.update_with_weight("x", u64::MAX - 1).unwrap();
    table.update("x");
    assert_eq!(table.estimate("x"), u64::MAX);

    let err = table.update_with_weight("y", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CounterOverflow);
    assert_eq!(table.total_weight(), u64::MAX);
    assert_eq!(table.estimate("x"), u64::MAX);
}

#[test]
fn test_one_sided_error() {
    let mut table = FrequencyTable::with_seed(0.01, 0.01, 77).unwrap();
    let mut exact: HashMap<String, u64> = HashMap::new();
    for key in zipf_stream(20_000, 2_000, 11) {
        table.update(&key);
        *exact.entry(key).or_default() += 1;
    }
    for (key, count) in &exact {
        assert_that!(table.estimate(key), ge(*count));
    }
}

#[test]
fn test_error_bound_holds_for_most_keys() {
    let mut table = FrequencyTable::with_seed(0.01, 0.01, 78).unwrap();
    let mut exact: HashMap<String, u64> = HashMap::new();
    for key in zipf_stream(20_000, 2_000, 12) {
        table.update(&key);
        *exact.entry(key).or_default() += 1;
    }
    let slack = (table.relative_error() * table.total_weight() as f64) as u64;
    let violations = exact
        .iter()
        .filter(|(key, count)| table.estimate(key.as_str()) > **count + slack)
        .count();
    // Each key violates the bound with probability at most delta.
    assert_that!(violations, le(exact.len() / 20));
}

#[test]
fn test_coarse_table_only_overcounts() {
    let mut table = FrequencyTable::with_seed(0.9, 0.9, 3).unwrap();
    assert_eq!(table.num_hashes(), 1);
    assert_eq!(table.num_buckets(), 4);
    let mut exact: HashMap<u64, u64> = HashMap::new();
    for i in 0..500u64 {
        let key = i % 37;
        table.update(&key);
        *exact.entry(key).or_default() += 1;
    }
    for (key, count) in &exact {
        assert_that!(table.estimate(key), ge(*count));
    }
}

#[test]
fn test_estimates_never_decrease_under_unrelated_keys() {
    let mut table = FrequencyTable::with_seed(0.9, 0.9, 15).unwrap();
    table.update_with_weight("watched", 3).unwrap();

    let mut previous = table.estimate("watched");
    for i in 0..500u64 {
        table.update(&i);
        let current = table.estimate("watched");
        assert_that!(current, ge(previous));
        previous = current;
    }
    assert_that!(previous, ge(4));
}

#[test]
fn test_merge() {
    let mut left = FrequencyTable::with_seed(0.01, 0.05, 42).unwrap();
    let mut right = FrequencyTable::with_seed(0.01, 0.05, 42).unwrap();
    for _ in 0..10 {
        left.update("a");
    }
    for _ in 0..4 {
        right.update("a");
        right.update("b");
    }
    left.merge(&right).unwrap();
    assert_eq!(left.total_weight(), 18);
    assert_that!(left.estimate("a"), ge(14));
    assert_that!(left.estimate("b"), ge(4));
}

#[test]
fn test_merge_matches_single_pass() {
    let stream = zipf_stream(5_000, 300, 21);
    let mut whole = FrequencyTable::with_seed(0.01, 0.05, 8).unwrap();
    let mut left = FrequencyTable::with_seed(0.01, 0.05, 8).unwrap();
    let mut right = FrequencyTable::with_seed(0.01, 0.05, 8).unwrap();
    for (i, key) in stream.iter().enumerate() {
        whole.update(key);
        if i % 2 == 0 {
            left.update(key);
        } else {
            right.update(key);
        }
    }
    left.merge(&right).unwrap();
    assert_eq!(left, whole);
}

#[test]
fn test_merge_incompatible() {
    let mut left = FrequencyTable::with_seed(0.01, 0.05, 1).unwrap();
    let other_seed = FrequencyTable::with_seed(0.01, 0.05, 2).unwrap();
    let other_shape = FrequencyTable::with_seed(0.1, 0.05, 1).unwrap();
    left.update("a");

    let err = left.merge(&other_seed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleSketch);
    let err = left.merge(&other_shape).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleSketch);
    assert_eq!(left.total_weight(), 1);
}

#[test]
fn test_merge_overflow_leaves_table_unchanged() {
    let mut left = FrequencyTable::with_seed(0.1, 0.1, 4).unwrap();
    let mut right = FrequencyTable::with_seed(0.1, 0.1, 4).unwrap();
    left.update_with_weight("a", u64::MAX).unwrap();
    right.update("a");
    let err = left.merge(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CounterOverflow);
    assert_eq!(left.estimate("a"), u64::MAX);
}

#[test]
fn test_explicit_family_is_deterministic() {
    let functions = vec![
        HashFunction::new(1_234_567, 89, MERSENNE_PRIME_61, 64).unwrap(),
        HashFunction::new(987_654_321, 12_345, MERSENNE_PRIME_61, 64).unwrap(),
        HashFunction::new(55_555, 1, MERSENNE_PRIME_61, 64).unwrap(),
    ];
    let family = HashFamily::from_functions(functions).unwrap();
    let mut left = FrequencyTable::from_family(family.clone()).unwrap();
    let mut right = FrequencyTable::from_family(family).unwrap();
    assert_eq!(left.num_hashes(), 3);
    assert_eq!(left.num_buckets(), 64);

    for key in zipf_stream(2_000, 100, 5) {
        left.update(&key);
        right.update(&key);
    }
    assert_eq!(left, right);
    assert_eq!(left.estimate("k0"), right.estimate("k0"));
}

#[test]
fn test_reset() {
    let mut table = FrequencyTable::with_seed(0.01, 0.05, 6).unwrap();
    let family = table.hash_family().clone();
    table.update("a");
    table.reset();
    assert!(table.is_empty());
    assert_eq!(table.estimate("a"), 0);
    assert_eq!(table.hash_family(), &family);
}

#[test]
fn test_increment_single_key() {
    let mut table = FrequencyTable::with_seed(0.02, 0.1, 10).unwrap();
    for _ in 0..300 {
        table.update("key");
    }
    assert_eq!(table.estimate("key"), 300);
}

#[test]
fn test_increment_multi() {
    let mut table = FrequencyTable::with_seed(0.0025, 0.02, 10).unwrap();
    for i in 0..100_000u64 {
        table.update(&(i % 100));
    }
    for key in 0..100u64 {
        assert_that!(table.estimate(&key), ge(1_000));
    }
}
