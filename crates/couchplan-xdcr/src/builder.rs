// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Link builders, one per rule shape.
//!
//! Builders work on a single replication group whose members are already
//! sorted by path. They return `(source, destination)` pairs; the engine
//! attaches the rule color.

use std::collections::BTreeMap;

use couchplan_core::{Bucket, LabelSource};

/// Label key holding the level of a bucket in a tree.
pub const LEVEL_LABEL: &str = "Level";

/// A directed `(source, destination)` pair.
pub type Pair<'a> = (&'a Bucket, &'a Bucket);

/// Cycle through `sources`: `S[i] -> S[i+1]`, closed by `S[n-1] -> S[0]`.
///
/// Fewer than two sources yield nothing. When `bidirectional` and more than two
/// sources are present, every edge is doubled in the opposite direction; a
/// two-member ring is already a 2-cycle and is not doubled.
#[must_use]
pub fn build_ring<'a>(sources: &[&'a Bucket], bidirectional: bool) -> Vec<Pair<'a>> {
    let n = sources.len();
    if n < 2 {
        return Vec::new();
    }
    let double = bidirectional && n > 2;

    let mut pairs = Vec::with_capacity(if double { 2 * n } else { n });
    for i in 0..n {
        let (from, to) = (sources[i], sources[(i + 1) % n]);
        pairs.push((from, to));
        if double {
            pairs.push((to, from));
        }
    }
    pairs
}

/// Every source to every destination, doubled when `bidirectional`.
#[must_use]
pub fn build_custom<'a>(
    sources: &[&'a Bucket],
    destinations: &[&'a Bucket],
    bidirectional: bool,
) -> Vec<Pair<'a>> {
    let mut pairs = Vec::new();
    for &source in sources {
        for &destination in destinations {
            pairs.push((source, destination));
            if bidirectional {
                pairs.push((destination, source));
            }
        }
    }
    pairs
}

/// Link adjacent `Level` values of `sources`.
///
/// Levels compare lexicographically and a missing label is the empty level.
/// Each bucket of level `i + 1` receives one edge from level `i`, its parent
/// chosen round-robin. With `upward` the edge runs child to parent instead.
#[must_use]
pub fn build_tree<'a>(sources: &[&'a Bucket], upward: bool, bidirectional: bool) -> Vec<Pair<'a>> {
    let mut levels: BTreeMap<&'a str, Vec<&'a Bucket>> = BTreeMap::new();
    for &bucket in sources {
        levels.entry(bucket.label(LEVEL_LABEL).unwrap_or_default()).or_default().push(bucket);
    }

    let levels: Vec<Vec<&'a Bucket>> = levels.into_values().collect();
    let mut pairs = Vec::new();
    for window in levels.windows(2) {
        let (parents, children) = (&window[0], &window[1]);
        for (j, &child) in children.iter().enumerate() {
            let parent = parents[j % parents.len()];
            let pair = if upward { (child, parent) } else { (parent, child) };
            pairs.push(pair);
            if bidirectional {
                pairs.push((pair.1, pair.0));
            }
        }
    }
    pairs
}
