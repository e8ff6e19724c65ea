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

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Builds a shuffled stream over `distinct` keys `k0, k1, ...` where key `i`
/// occurs roughly `scale / (i + 1)` times, and at least once.
pub fn zipf_stream(scale: usize, distinct: usize, seed: u64) -> Vec<String> {
    let mut stream = Vec::new();
    for i in 0..distinct {
        let count = (scale / (i + 1)).max(1);
        stream.extend(std::iter::repeat_n(format!("k{i}"), count));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    stream.shuffle(&mut rng);
    stream
}

/// Returns the exact counts of `stream`, sorted like a tracker snapshot.
#[allow(dead_code)] // false-positive
pub fn exact_ranking(stream: &[String]) -> Vec<(String, u64)> {
    let mut counts = std::collections::HashMap::<&str, u64>::new();
    for key in stream {
        *counts.entry(key.as_str()).or_default() += 1;
    }
    let mut ranking: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranking
}
