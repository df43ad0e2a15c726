// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Derived replication links.

use std::fmt;

use couchplan_core::{Bucket, PathIdentifier};
use serde::{Deserialize, Serialize};

/// Widest topology boundary crossed by a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkScope {
    /// Both buckets live in the same cluster.
    IntraCluster,
    /// Different clusters of one cluster group.
    CrossCluster,
    /// Different cluster groups of one datacenter.
    CrossClusterGroup,
    /// Different datacenters.
    CrossDatacenter,
}

impl LinkScope {
    /// Scope of a link between two buckets.
    #[must_use]
    pub fn between(source: &Bucket, destination: &Bucket) -> Self {
        let (s, d) = (&source.identity, &destination.identity);
        if s.datacenter != d.datacenter {
            Self::CrossDatacenter
        } else if s.cluster_group != d.cluster_group {
            Self::CrossClusterGroup
        } else if s.cluster != d.cluster {
            Self::CrossCluster
        } else {
            Self::IntraCluster
        }
    }

    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntraCluster => "intraCluster",
            Self::CrossCluster => "crossCluster",
            Self::CrossClusterGroup => "crossClusterGroup",
            Self::CrossDatacenter => "crossDatacenter",
        }
    }
}

impl fmt::Display for LinkScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One replication link between two buckets.
///
/// Links borrow the buckets of the datacenters they were derived from and are
/// recomputed on every derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdcrLink<'a> {
    /// Replicated bucket.
    pub source: &'a Bucket,
    /// Receiving bucket.
    pub destination: &'a Bucket,
    /// Display color inherited from the rule.
    pub color: String,
}

impl<'a> XdcrLink<'a> {
    /// Create a link.
    #[must_use]
    pub fn new(source: &'a Bucket, destination: &'a Bucket, color: impl Into<String>) -> Self {
        Self { source, destination, color: color.into() }
    }

    /// The same link in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self { source: self.destination, destination: self.source, color: self.color.clone() }
    }

    /// Widest boundary crossed by this link.
    #[must_use]
    pub fn scope(&self) -> LinkScope {
        LinkScope::between(self.source, self.destination)
    }

    /// The `(source id, destination id, color)` triple of this link.
    #[must_use]
    pub fn edge(&self) -> Edge {
        Edge {
            source: self.source.path(),
            destination: self.destination.path(),
            color: self.color.clone(),
            scope: self.scope(),
        }
    }
}

impl fmt::Display for XdcrLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.path(), self.destination.path())
    }
}

/// Owned edge description of a link, keyed by bucket paths.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source bucket path.
    pub source: String,
    /// Destination bucket path.
    pub destination: String,
    /// Display color.
    pub color: String,
    /// Widest boundary crossed.
    pub scope: LinkScope,
}
