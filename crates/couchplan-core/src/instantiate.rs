// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Expansion of definitions into concrete entities.
//!
//! The instantiator threads an [`Identity`] down the hierarchy and copies the
//! definition labels onto every generated entity. Definitions are only read:
//! labels injected for one peak token can never leak into another.

use tracing::debug;

use crate::definition::{ClusterDef, ClusterGroupDef, TopologyBlueprint};
use crate::model::{Cluster, ClusterGroup, Datacenter, Identity, PathIdentifier};

/// Expand a cluster group definition for `datacenter`.
///
/// Produces one cluster group per peak token, each with one cluster per
/// (cluster definition, instance) pair and one bucket per template. A
/// definition without peak tokens, or a cluster definition without instances,
/// yields nothing for that branch.
#[must_use]
pub fn instantiate(datacenter: &str, def: &ClusterGroupDef) -> Vec<ClusterGroup> {
    def.peak_tokens
        .iter()
        .map(|peak_token| {
            let mut group = ClusterGroup {
                name: def.name.clone(),
                peak_token: peak_token.clone(),
                labels: def.labels.clone(),
                identity: Identity::datacenter(datacenter),
                clusters: Vec::new(),
            };

            let identity = group.identity.clone().with_cluster_group(group.group_id());
            group.clusters =
                def.cluster_defs.iter().flat_map(|c| instantiate_clusters(&identity, c)).collect();

            debug!(
                path = %group.path(),
                clusters = group.clusters.len(),
                "Instantiated cluster group"
            );
            group
        })
        .collect()
}

fn instantiate_clusters(identity: &Identity, def: &ClusterDef) -> Vec<Cluster> {
    def.instances
        .iter()
        .map(|instance| {
            let mut cluster = Cluster {
                name: def.name.clone(),
                instance: instance.clone(),
                labels: def.labels.clone(),
                identity: identity.clone(),
                buckets: Vec::with_capacity(def.buckets.len()),
            };

            let bucket_identity = identity.clone().with_cluster(cluster.cluster_id());
            cluster.buckets = def
                .buckets
                .iter()
                .map(|template| {
                    let mut bucket = template.clone();
                    bucket.identity = bucket_identity.clone();
                    bucket
                })
                .collect();
            cluster
        })
        .collect()
}

impl Datacenter {
    /// Instantiate a cluster group definition into this datacenter.
    pub fn add_cluster_group_def(&mut self, def: &ClusterGroupDef) {
        let groups = instantiate(&self.name, def);
        self.add_cluster_groups(groups);
    }

    /// Instantiate every definition of a blueprint into this datacenter.
    pub fn add_blueprint(&mut self, blueprint: &TopologyBlueprint) {
        for def in &blueprint.cluster_groups {
            self.add_cluster_group_def(def);
        }
    }
}
