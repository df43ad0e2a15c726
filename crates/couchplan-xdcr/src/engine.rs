// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Link derivation over a set of datacenters.

use couchplan_core::Datacenter;
use tracing::debug;

use crate::builder::{build_custom, build_ring, build_tree};
use crate::definition::XdcrDef;
use crate::link::XdcrLink;
use crate::partition::partition;
use crate::rule::XdcrRule;

/// Derive the links of one rule over every bucket of `datacenters`.
///
/// Buckets are partitioned by group hash, each group is built independently
/// and the results are concatenated in group-hash order. Degenerate groups
/// (empty sets, a ring of fewer than two members) contribute nothing.
#[must_use]
pub fn derive_xdcr<'a>(def: &XdcrDef, datacenters: &'a [Datacenter]) -> Vec<XdcrLink<'a>> {
    let groups = partition(def, datacenters.iter().flat_map(|dc| dc.buckets()));

    let mut links = Vec::new();
    for (hash, group) in &groups {
        let pairs = match def.rule {
            XdcrRule::Ring => build_ring(&group.sources, def.bidirectional),
            XdcrRule::Tree => build_tree(&group.sources, false, def.bidirectional),
            XdcrRule::Uptree => build_tree(&group.sources, true, def.bidirectional),
            XdcrRule::Custom => {
                build_custom(&group.sources, &group.destinations, def.bidirectional)
            }
        };
        debug!(
            rule = %def.rule,
            group = %hash,
            sources = group.sources.len(),
            destinations = group.destinations.len(),
            links = pairs.len(),
            "Built replication group"
        );
        links.extend(pairs.into_iter().map(|(s, d)| XdcrLink::new(s, d, def.color.clone())));
    }
    links
}

/// Derive the links of every rule, in rule order.
#[must_use]
pub fn derive_all<'a>(defs: &[XdcrDef], datacenters: &'a [Datacenter]) -> Vec<XdcrLink<'a>> {
    defs.iter().flat_map(|def| derive_xdcr(def, datacenters)).collect()
}
