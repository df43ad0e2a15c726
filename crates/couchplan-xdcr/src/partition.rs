// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Selector filtering and grouping of buckets.

use std::collections::BTreeMap;

use couchplan_core::{Bucket, LabelSource, PathIdentifier};

use crate::definition::XdcrDef;

/// Buckets of one replication group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationGroup<'a> {
    /// Buckets matching `source` and not `sourceExclude`, sorted by path.
    pub sources: Vec<&'a Bucket>,
    /// Buckets matching `destination` and not `destinationExclude`, sorted by path.
    pub destinations: Vec<&'a Bucket>,
}

/// Partition buckets into replication groups keyed by group hash.
///
/// A bucket may land in both the source and the destination set of its group.
/// Groups are returned in hash order and their members in path order, so the
/// derived links are reproducible.
pub fn partition<'a, I>(def: &XdcrDef, buckets: I) -> BTreeMap<String, ReplicationGroup<'a>>
where
    I: IntoIterator<Item = &'a Bucket>,
{
    let mut groups: BTreeMap<String, ReplicationGroup<'a>> = BTreeMap::new();

    for bucket in buckets {
        let is_source =
            bucket.matches(Some(&def.source)) && !bucket.matches(def.source_exclude.as_ref());
        let is_destination = bucket.matches(def.destination.as_ref())
            && !bucket.matches(def.destination_exclude.as_ref());
        if !is_source && !is_destination {
            continue;
        }

        let group = groups.entry(bucket.group_hash(&def.group_on)).or_default();
        if is_source {
            group.sources.push(bucket);
        }
        if is_destination {
            group.destinations.push(bucket);
        }
    }

    for group in groups.values_mut() {
        group.sources.sort_by_cached_key(|b| b.path());
        group.destinations.sort_by_cached_key(|b| b.path());
    }
    groups
}
