// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Per-entity field schemas.
//!
//! Each entity declares which of its fields take part in a diff and how they
//! compare: a [`FieldKind::Value`] field is compared by equality, a
//! [`FieldKind::Composition`] field is a list of child entities matched by path.
//! Fields absent from the schema (names, the datacenter version tag) are never
//! compared.

use std::fmt;

use couchplan_core::{Bucket, Cluster, ClusterGroup, Datacenter, Labels, PathIdentifier};
use serde::Serialize;

/// How a field is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared by equality; a mismatch records both values.
    Value,
    /// List of child entities, matched by path and diffed recursively.
    Composition,
}

impl FieldKind {
    /// Convert to string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Composition => "composition",
        }
    }
}

/// One field taking part in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, as it appears in documents and reports.
    pub name: &'static str,
    /// Comparison kind.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// A value field.
    #[must_use]
    pub const fn value(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Value }
    }

    /// A composition field.
    #[must_use]
    pub const fn composition(name: &'static str) -> Self {
        Self { name, kind: FieldKind::Composition }
    }
}

/// Snapshot of a value field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value.
    Number(u64),
    /// Label set.
    Labels(Labels),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Labels(labels) => write!(f, "{labels}"),
        }
    }
}

/// An entity that can be diffed field by field.
pub trait Diffable: PathIdentifier {
    /// Entity kind, for error messages.
    fn kind(&self) -> &'static str;

    /// Fields taking part in the diff, in declaration order.
    fn schema(&self) -> &'static [FieldSpec];

    /// Current value of a value field.
    fn value(&self, field: &str) -> Option<FieldValue>;

    /// Children of a composition field.
    fn children(&self, field: &str) -> Option<Vec<&dyn Diffable>>;
}

fn as_diffable<T: Diffable>(items: &[T]) -> Vec<&dyn Diffable> {
    items.iter().map(|item| item as &dyn Diffable).collect()
}

const DATACENTER_SCHEMA: &[FieldSpec] = &[FieldSpec::composition("clusterGroups")];

const CLUSTER_GROUP_SCHEMA: &[FieldSpec] =
    &[FieldSpec::value("labels"), FieldSpec::composition("clusters")];

const CLUSTER_SCHEMA: &[FieldSpec] =
    &[FieldSpec::value("labels"), FieldSpec::composition("buckets")];

const BUCKET_SCHEMA: &[FieldSpec] = &[
    FieldSpec::value("ramQuota"),
    FieldSpec::value("cbReplicatNumber"),
    FieldSpec::value("labels"),
];

impl Diffable for Datacenter {
    fn kind(&self) -> &'static str {
        "Datacenter"
    }

    fn schema(&self) -> &'static [FieldSpec] {
        DATACENTER_SCHEMA
    }

    fn value(&self, _field: &str) -> Option<FieldValue> {
        None
    }

    fn children(&self, field: &str) -> Option<Vec<&dyn Diffable>> {
        match field {
            "clusterGroups" => Some(as_diffable(&self.cluster_groups)),
            _ => None,
        }
    }
}

impl Diffable for ClusterGroup {
    fn kind(&self) -> &'static str {
        "ClusterGroup"
    }

    fn schema(&self) -> &'static [FieldSpec] {
        CLUSTER_GROUP_SCHEMA
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "labels" => Some(FieldValue::Labels(self.labels.clone())),
            _ => None,
        }
    }

    fn children(&self, field: &str) -> Option<Vec<&dyn Diffable>> {
        match field {
            "clusters" => Some(as_diffable(&self.clusters)),
            _ => None,
        }
    }
}

impl Diffable for Cluster {
    fn kind(&self) -> &'static str {
        "Cluster"
    }

    fn schema(&self) -> &'static [FieldSpec] {
        CLUSTER_SCHEMA
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "labels" => Some(FieldValue::Labels(self.labels.clone())),
            _ => None,
        }
    }

    fn children(&self, field: &str) -> Option<Vec<&dyn Diffable>> {
        match field {
            "buckets" => Some(as_diffable(&self.buckets)),
            _ => None,
        }
    }
}

impl Diffable for Bucket {
    fn kind(&self) -> &'static str {
        "Bucket"
    }

    fn schema(&self) -> &'static [FieldSpec] {
        BUCKET_SCHEMA
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "ramQuota" => Some(FieldValue::Number(self.ram_quota)),
            "cbReplicatNumber" => Some(FieldValue::Number(u64::from(self.replica_number))),
            "labels" => Some(FieldValue::Labels(self.labels.clone())),
            _ => None,
        }
    }

    fn children(&self, _field: &str) -> Option<Vec<&dyn Diffable>> {
        None
    }
}
