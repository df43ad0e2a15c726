// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Concrete topology entities.
//!
//! Ownership is a strict tree: a [`Datacenter`] owns its [`ClusterGroup`]s, which
//! own their [`Cluster`]s, which own their [`Bucket`]s. Entities are built by the
//! instantiator and never mutated afterwards.
//!
//! Every entity exposes a [`PathIdentifier::path`]: the identity used to match
//! "the same entity" across two versions of a tree.

use serde::{Deserialize, Serialize};

use crate::labels::{LabelSource, Labels};

/// Label key resolving to the owning datacenter.
pub const DATACENTER_LABEL: &str = "Datacenter";
/// Label key resolving to the owning cluster group identity (`<name>_<peakToken>`).
pub const CLUSTER_GROUP_LABEL: &str = "ClusterGroup";
/// Label key resolving to the owning cluster identity (`<name>_<instance>`).
pub const CLUSTER_LABEL: &str = "Cluster";
/// Label key resolving to the bucket name.
pub const NAME_LABEL: &str = "name";

/// Separator between path segments.
pub const PATH_SEPARATOR: &str = "_";

/// Entities uniquely identified by their path.
pub trait PathIdentifier {
    /// Deterministic identity string, unique within a datacenter.
    fn path(&self) -> String;
}

/// Ancestor identity threaded down by the instantiator.
///
/// Each field holds the identifying segment of one ancestor level. Fields of
/// levels at or below the entity itself stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Owning datacenter name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub datacenter: String,
    /// Owning cluster group identity, `<name>_<peakToken>`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_group: String,
    /// Owning cluster identity, `<name>_<instance>`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster: String,
}

impl Identity {
    /// Identity of an entity directly under a datacenter.
    #[must_use]
    pub fn datacenter(datacenter: impl Into<String>) -> Self {
        Self { datacenter: datacenter.into(), ..Self::default() }
    }

    /// Descend into a cluster group.
    #[must_use]
    pub fn with_cluster_group(mut self, cluster_group: impl Into<String>) -> Self {
        self.cluster_group = cluster_group.into();
        self
    }

    /// Descend into a cluster.
    #[must_use]
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    /// Returns true if no ancestor is recorded (e.g. a bucket template).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datacenter.is_empty() && self.cluster_group.is_empty() && self.cluster.is_empty()
    }

    /// Resolve one of the reserved ancestor label keys.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        let value = match key {
            DATACENTER_LABEL => &self.datacenter,
            CLUSTER_GROUP_LABEL => &self.cluster_group,
            CLUSTER_LABEL => &self.cluster,
            _ => return None,
        };
        (!value.is_empty()).then_some(value.as_str())
    }
}

/// Join identity segments with [`PATH_SEPARATOR`].
fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(PATH_SEPARATOR)
}

/// A named datacenter holding cluster groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    /// Unique datacenter name.
    pub name: String,
    /// Version tag of this tree.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Cluster groups, in instantiation order.
    #[serde(default)]
    pub cluster_groups: Vec<ClusterGroup>,
}

impl Datacenter {
    /// Create an empty datacenter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), version: String::new(), cluster_groups: Vec::new() }
    }

    /// Set the version tag.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Append already instantiated cluster groups.
    pub fn add_cluster_groups(&mut self, groups: impl IntoIterator<Item = ClusterGroup>) {
        self.cluster_groups.extend(groups);
    }

    /// Iterate every cluster of the datacenter.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.cluster_groups.iter().flat_map(|cg| cg.clusters.iter())
    }

    /// Iterate every bucket of the datacenter.
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.clusters().flat_map(|c| c.buckets.iter())
    }
}

impl PathIdentifier for Datacenter {
    fn path(&self) -> String {
        self.name.clone()
    }
}

/// One concrete cluster group, fanned out from a definition by peak token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroup {
    /// Definition name.
    pub name: String,
    /// Site discriminator this group was instantiated for.
    #[serde(default)]
    pub peak_token: String,
    /// Free-form labels copied from the definition.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Ancestor identity (datacenter only).
    #[serde(default)]
    pub identity: Identity,
    /// Clusters, in instantiation order.
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

impl ClusterGroup {
    /// Identity segment of this group, `<name>_<peakToken>`.
    #[must_use]
    pub fn group_id(&self) -> String {
        join_path(&[&self.name, &self.peak_token])
    }
}

impl PathIdentifier for ClusterGroup {
    fn path(&self) -> String {
        join_path(&[&self.identity.datacenter, &self.name, &self.peak_token])
    }
}

/// One concrete cluster instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Definition name.
    pub name: String,
    /// Instance identifier.
    #[serde(default)]
    pub instance: String,
    /// Free-form labels copied from the definition.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Ancestor identity (datacenter and cluster group).
    #[serde(default)]
    pub identity: Identity,
    /// Buckets, in template order.
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

impl Cluster {
    /// Identity segment of this cluster, `<name>_<instance>`.
    #[must_use]
    pub fn cluster_id(&self) -> String {
        join_path(&[&self.name, &self.instance])
    }
}

impl PathIdentifier for Cluster {
    fn path(&self) -> String {
        join_path(&[
            &self.identity.datacenter,
            &self.identity.cluster_group,
            &self.name,
            &self.instance,
        ])
    }
}

/// A bucket: the leaf entity and the unit of replication.
///
/// The same type doubles as the bucket template of a [`crate::ClusterDef`]; a
/// template simply carries an empty [`Identity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
    /// RAM quota in MiB.
    #[serde(rename = "ramQuota", default)]
    pub ram_quota: u64,
    /// Number of in-cluster replicas.
    #[serde(rename = "cbReplicatNumber", default)]
    pub replica_number: u32,
    /// Free-form labels.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Ancestor identity, empty on templates.
    #[serde(default, skip_serializing_if = "Identity::is_empty")]
    pub identity: Identity,
}

impl Bucket {
    /// Create a bucket template.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Set the RAM quota.
    #[must_use]
    pub fn with_ram_quota(mut self, ram_quota: u64) -> Self {
        self.ram_quota = ram_quota;
        self
    }

    /// Set the replica count.
    #[must_use]
    pub fn with_replica_number(mut self, replica_number: u32) -> Self {
        self.replica_number = replica_number;
        self
    }

    /// Set a free-form label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key, value);
        self
    }
}

impl PathIdentifier for Bucket {
    fn path(&self) -> String {
        join_path(&[
            &self.identity.datacenter,
            &self.identity.cluster_group,
            &self.identity.cluster,
            &self.name,
        ])
    }
}

impl LabelSource for Bucket {
    /// Reserved keys resolve from the identity and the bucket name; any other key
    /// resolves from the free-form labels.
    fn label(&self, key: &str) -> Option<&str> {
        if key == NAME_LABEL {
            return Some(self.name.as_str());
        }
        self.identity.label(key).or_else(|| self.labels.get(key))
    }
}

impl LabelSource for Cluster {
    fn label(&self, key: &str) -> Option<&str> {
        self.identity.label(key).or_else(|| self.labels.get(key))
    }
}

impl LabelSource for ClusterGroup {
    fn label(&self, key: &str) -> Option<&str> {
        self.identity.label(key).or_else(|| self.labels.get(key))
    }
}
