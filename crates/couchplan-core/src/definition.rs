// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Compact topology definitions.
//!
//! A definition is a Cartesian-product generator: one [`ClusterGroupDef`] with
//! N peak tokens and M instances per cluster produces N concrete cluster groups,
//! each holding M clusters per [`ClusterDef`], each carrying the same bucket
//! templates.
//!
//! # Example YAML
//!
//! ```yaml
//! clusterGroups:
//!   - name: CG
//!     peakToken: [PK1, PK2]
//!     labels: { Site: Paris }
//!     clusters:
//!       - name: Booking
//!         instances: [A, B]
//!         buckets:
//!           - name: Hyatt
//!             ramQuota: 256
//!             labels: { Company: Hyatt }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::labels::Labels;
use crate::model::Bucket;

/// Bucket template of a cluster definition.
///
/// Templates are plain [`Bucket`]s without identity; the instantiator stamps
/// one copy per cluster instance.
pub type BucketTemplate = Bucket;

/// Definition of a topology at cluster group level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterGroupDef {
    /// Cluster group name.
    pub name: String,
    /// One concrete cluster group is created per peak token.
    #[serde(rename = "peakToken", default)]
    pub peak_tokens: Vec<String>,
    /// Labels copied onto every concrete cluster group.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Cluster definitions instantiated under every cluster group.
    #[serde(rename = "clusters", default)]
    pub cluster_defs: Vec<ClusterDef>,
}

impl ClusterGroupDef {
    /// Create an empty definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Set the peak tokens.
    #[must_use]
    pub fn with_peak_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.peak_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Set a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Add a cluster definition.
    #[must_use]
    pub fn with_cluster(mut self, cluster: ClusterDef) -> Self {
        self.cluster_defs.push(cluster);
        self
    }

    /// Check that every level of the definition is named.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidDefinition("cluster group name is required".to_string()));
        }
        for cluster in &self.cluster_defs {
            cluster.validate().map_err(|e| match e {
                Error::InvalidDefinition(msg) => {
                    Error::InvalidDefinition(format!("cluster group '{}': {msg}", self.name))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Definition of a topology at cluster level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDef {
    /// Cluster name.
    pub name: String,
    /// One concrete cluster is created per instance identifier.
    #[serde(default)]
    pub instances: Vec<String>,
    /// Labels copied onto every concrete cluster.
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
    /// Bucket templates stamped into every concrete cluster.
    #[serde(default)]
    pub buckets: Vec<BucketTemplate>,
}

impl ClusterDef {
    /// Create an empty cluster definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Set the instance identifiers.
    #[must_use]
    pub fn with_instances<I, S>(mut self, instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instances = instances.into_iter().map(Into::into).collect();
        self
    }

    /// Set a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key, value);
        self
    }

    /// Add a bucket template.
    #[must_use]
    pub fn with_bucket(mut self, bucket: BucketTemplate) -> Self {
        self.buckets.push(bucket);
        self
    }

    /// Check that the cluster and its buckets are named.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidDefinition("cluster name is required".to_string()));
        }
        if self.buckets.iter().any(|b| b.name.is_empty()) {
            return Err(Error::InvalidDefinition(format!(
                "cluster '{}': bucket name is required",
                self.name
            )));
        }
        Ok(())
    }
}

/// Top-level topology document listing one or several cluster group definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyBlueprint {
    /// Cluster group definitions, applied in order.
    #[serde(rename = "clusterGroups", alias = "clustergroups", alias = "ClusterGroups", default)]
    pub cluster_groups: Vec<ClusterGroupDef>,
}

impl TopologyBlueprint {
    /// Validate every definition of the blueprint.
    pub fn validate(&self) -> Result<()> {
        self.cluster_groups.iter().try_for_each(ClusterGroupDef::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let def = ClusterGroupDef::new("CG")
            .with_peak_tokens(["PK1", "PK2"])
            .with_label("Site", "Paris")
            .with_cluster(
                ClusterDef::new("Booking")
                    .with_instances(["A"])
                    .with_bucket(BucketTemplate::new("Hyatt")),
            );

        assert_eq!(def.peak_tokens, vec!["PK1", "PK2"]);
        assert_eq!(def.labels.get("Site"), Some("Paris"));
        assert_eq!(def.cluster_defs[0].buckets[0].name, "Hyatt");
        assert!(def.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unnamed() {
        assert!(ClusterGroupDef::new("").validate().is_err());

        let def = ClusterGroupDef::new("CG").with_cluster(ClusterDef::new(""));
        let err = def.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid definition: cluster group 'CG': cluster name is required");

        let def = ClusterGroupDef::new("CG")
            .with_cluster(ClusterDef::new("Booking").with_bucket(BucketTemplate::new("")));
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_deserialize_field_names() {
        let json = r#"{
            "name": "CG",
            "peakToken": ["PK1"],
            "clusters": [
                {"name": "Booking", "instances": ["A", "B"],
                 "buckets": [{"name": "Hyatt", "ramQuota": 100, "cbReplicatNumber": 1}]}
            ]
        }"#;
        let def: ClusterGroupDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.peak_tokens, vec!["PK1"]);
        assert!(def.labels.is_empty());
        assert_eq!(def.cluster_defs[0].instances.len(), 2);
        assert_eq!(def.cluster_defs[0].buckets[0].ram_quota, 100);
        assert_eq!(def.cluster_defs[0].buckets[0].replica_number, 1);
    }

    #[test]
    fn test_optional_fields_default() {
        let def: ClusterGroupDef = serde_json::from_str(r#"{"name": "CG"}"#).unwrap();
        assert!(def.peak_tokens.is_empty());
        assert!(def.cluster_defs.is_empty());
    }

    #[test]
    fn test_blueprint_aliases() {
        for key in ["clusterGroups", "clustergroups", "ClusterGroups"] {
            let json = format!(r#"{{"{key}": [{{"name": "CG"}}]}}"#);
            let blueprint: TopologyBlueprint = serde_json::from_str(&json).unwrap();
            assert_eq!(blueprint.cluster_groups.len(), 1, "key {key}");
        }
    }
}
