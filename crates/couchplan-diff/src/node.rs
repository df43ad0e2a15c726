// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Diff tree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::FieldValue;

/// Old and new value of a value field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueChange {
    /// Value in the current tree.
    pub current: FieldValue,
    /// Value in the proposed tree.
    pub proposed: FieldValue,
}

/// Changes to the children of a composition field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompositionChange {
    /// Children present on both sides whose diff is not empty, sorted by path.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<DiffNode>,
    /// Paths of children only present in the proposed tree, sorted.
    #[serde(rename = "new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    /// Paths of children only present in the current tree, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
}

impl CompositionChange {
    /// Returns true if no child was modified, added or deleted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Differences between two versions of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffNode {
    /// Path shared by both versions.
    pub path: String,
    /// Mismatching value fields, by field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, ValueChange>,
    /// Non-empty composition changes, by field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub compositions: BTreeMap<String, CompositionChange>,
}

impl DiffNode {
    /// Create an empty node.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), values: BTreeMap::new(), compositions: BTreeMap::new() }
    }

    /// Returns true if both versions are equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.compositions.values().all(CompositionChange::is_empty)
    }

    /// Count value changes, additions and deletions in the whole subtree.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.values.len()
            + self
                .compositions
                .values()
                .map(|c| {
                    c.added.len()
                        + c.deleted.len()
                        + c.modified.iter().map(DiffNode::change_count).sum::<usize>()
                })
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_node() {
        let mut node = DiffNode::new("DC1");
        assert!(node.is_empty());
        assert_eq!(node.change_count(), 0);

        node.compositions.insert("clusterGroups".into(), CompositionChange::default());
        assert!(node.is_empty());
    }

    #[test]
    fn test_change_count() {
        let mut child = DiffNode::new("DC1_CG_PK1");
        child.values.insert(
            "labels".into(),
            ValueChange {
                current: FieldValue::Number(1),
                proposed: FieldValue::Number(2),
            },
        );

        let mut node = DiffNode::new("DC1");
        node.compositions.insert(
            "clusterGroups".into(),
            CompositionChange {
                modified: vec![child],
                added: vec!["DC1_CG_PK3".into()],
                deleted: vec!["DC1_CG_PK2".into()],
            },
        );
        assert!(!node.is_empty());
        assert_eq!(node.change_count(), 3);
    }

    #[test]
    fn test_serialize() {
        let mut node = DiffNode::new("DC1");
        node.compositions.insert(
            "clusterGroups".into(),
            CompositionChange { added: vec!["DC1_CG_PK3".into()], ..Default::default() },
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["path"], "DC1");
        assert_eq!(json["compositions"]["clusterGroups"]["new"][0], "DC1_CG_PK3");
        assert!(json.get("values").is_none());
    }
}
