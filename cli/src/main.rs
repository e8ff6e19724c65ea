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

//! Prints the most frequent tokens of a text stream.
//!
//! ```shell
//! heavyhitters -k 5 --hashtags --exact tweets.txt
//! RUST_LOG=heavyhitters=trace heavyhitters -k 3 < words.txt
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use heavyhitters::topk::DEFAULT_DELTA;
use heavyhitters::topk::DEFAULT_EPSILON;
use heavyhitters::topk::Row;
use heavyhitters::topk::TopKTracker;
use heavyhitters::topk::TopKTrackerBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "heavyhitters", version, about)]
struct Args {
    /// Number of tokens to report.
    #[arg(short, default_value_t = 10)]
    k: usize,

    /// Probability that an estimate exceeds its error bound.
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    delta: f64,

    /// Relative error, as a fraction of the number of tokens.
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Seed for the hash parameters.
    #[arg(long)]
    seed: Option<u64>,

    /// Only count `#hashtag` tokens, lowercased.
    #[arg(long)]
    hashtags: bool,

    /// Also compute exact counts and print the overestimate of each row.
    #[arg(long)]
    exact: bool,

    /// Input file. Reads stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut builder = TopKTrackerBuilder::new(args.k)
        .delta(args.delta)
        .epsilon(args.epsilon);
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut tracker: TopKTracker<String> = builder.build().context("invalid parameters")?;
    let mut exact = args.exact.then(HashMap::new);

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        for token in tokens(&line, args.hashtags) {
            if let Some(exact) = exact.as_mut() {
                *exact.entry(token.clone()).or_insert(0u64) += 1;
            }
            tracker.observe(token);
        }
    }
    tracing::debug!(
        total = tracker.total_weight(),
        candidates = tracker.len(),
        "finished reading input"
    );

    print!("{}", render(&tracker.snapshot(), exact.as_ref()));
    Ok(())
}

/// Splits a line on whitespace. In hashtag mode only tokens starting with
/// `#` survive, lowercased.
fn tokens(line: &str, hashtags: bool) -> impl Iterator<Item = String> {
    line.split_whitespace().filter_map(move |token| {
        if !hashtags {
            return Some(token.to_string());
        }
        (token.len() > 1 && token.starts_with('#')).then(|| token.to_lowercase())
    })
}

fn render(rows: &[Row<String>], exact: Option<&HashMap<String, u64>>) -> String {
    let mut out = match exact {
        None => format!("{:>4}  {:>10}  token\n", "rank", "estimate"),
        Some(_) => format!(
            "{:>4}  {:>10}  {:>10}  {:>5}  token\n",
            "rank", "estimate", "exact", "over"
        ),
    };
    for (rank, row) in rows.iter().enumerate() {
        let line = match exact {
            None => format!("{:>4}  {:>10}  {}\n", rank + 1, row.estimate(), row.item()),
            Some(exact) => {
                let count = exact.get(row.item()).copied().unwrap_or(0);
                format!(
                    "{:>4}  {:>10}  {:>10}  {:>5}  {}\n",
                    rank + 1,
                    row.estimate(),
                    count,
                    row.estimate().saturating_sub(count),
                    row.item()
                )
            }
        };
        out.push_str(&line);
    }
    out
}
