// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Structural comparison of two entity trees.

use std::collections::BTreeMap;

use couchplan_core::PathIdentifier;
use tracing::{debug, warn};

use crate::error::{DiffError, Result};
use crate::node::{CompositionChange, DiffNode, ValueChange};
use crate::schema::{Diffable, FieldKind, FieldSpec, FieldValue};

/// Children of one composition field matched by path.
#[derive(Debug)]
pub struct ChildMatch<'a, T: ?Sized> {
    /// `(current, proposed)` pairs sharing a path, sorted by path.
    pub same: Vec<(&'a T, &'a T)>,
    /// Children only present in the proposed list, sorted by path.
    pub added: Vec<&'a T>,
    /// Children only present in the current list, sorted by path.
    pub deleted: Vec<&'a T>,
}

fn index_by_path<'a, T>(side: &str, items: &[&'a T]) -> BTreeMap<String, &'a T>
where
    T: PathIdentifier + ?Sized,
{
    let mut index = BTreeMap::new();
    for &item in items {
        let path = item.path();
        if index.insert(path.clone(), item).is_some() {
            warn!(side, path = %path, "Duplicate child path, keeping the last one");
        }
    }
    index
}

/// Match two child lists by path.
///
/// When a list holds several children with the same path, the last one wins.
pub fn match_children<'a, T>(current: &[&'a T], proposed: &[&'a T]) -> ChildMatch<'a, T>
where
    T: PathIdentifier + ?Sized,
{
    let current = index_by_path("current", current);
    let mut proposed = index_by_path("proposed", proposed);

    let mut same = Vec::new();
    let mut deleted = Vec::new();
    for (path, item) in current {
        match proposed.remove(&path) {
            Some(other) => same.push((item, other)),
            None => deleted.push(item),
        }
    }
    ChildMatch { same, added: proposed.into_values().collect(), deleted }
}

/// Diff two versions of the same entity.
///
/// # Errors
///
/// Returns [`DiffError::IdentityMismatch`] when the roots have different paths,
/// [`DiffError::KindMismatch`] when they are different kinds of entity, and
/// [`DiffError::UnknownField`] when an entity does not expose a field of its
/// own schema. Nothing is compared when the roots are rejected.
pub fn diff(current: &dyn Diffable, proposed: &dyn Diffable) -> Result<DiffNode> {
    let node = diff_node(current, proposed)?;
    debug!(path = %node.path, changes = node.change_count(), "Computed diff");
    Ok(node)
}

fn diff_node(current: &dyn Diffable, proposed: &dyn Diffable) -> Result<DiffNode> {
    let path = current.path();
    let proposed_path = proposed.path();
    if path != proposed_path {
        return Err(DiffError::IdentityMismatch { current: path, proposed: proposed_path });
    }
    if current.kind() != proposed.kind() {
        return Err(DiffError::KindMismatch {
            path,
            current: current.kind(),
            proposed: proposed.kind(),
        });
    }

    let mut node = DiffNode::new(path);
    for spec in current.schema() {
        match spec.kind {
            FieldKind::Value => {
                let old = value_of(current, spec)?;
                let new = value_of(proposed, spec)?;
                if old != new {
                    let change = ValueChange { current: old, proposed: new };
                    node.values.insert(spec.name.to_string(), change);
                }
            }
            FieldKind::Composition => {
                let change = diff_composition(
                    &children_of(current, spec)?,
                    &children_of(proposed, spec)?,
                )?;
                if !change.is_empty() {
                    debug!(
                        path = %node.path,
                        field = spec.name,
                        modified = change.modified.len(),
                        added = change.added.len(),
                        deleted = change.deleted.len(),
                        "Composition changed"
                    );
                    node.compositions.insert(spec.name.to_string(), change);
                }
            }
        }
    }
    Ok(node)
}

fn diff_composition(
    current: &[&dyn Diffable],
    proposed: &[&dyn Diffable],
) -> Result<CompositionChange> {
    let matched = match_children(current, proposed);

    let mut change = CompositionChange {
        modified: Vec::new(),
        added: matched.added.iter().map(|c| c.path()).collect(),
        deleted: matched.deleted.iter().map(|c| c.path()).collect(),
    };
    for (old, new) in matched.same {
        let child = diff_node(old, new)?;
        if !child.is_empty() {
            change.modified.push(child);
        }
    }
    Ok(change)
}

fn value_of(entity: &dyn Diffable, spec: &FieldSpec) -> Result<FieldValue> {
    entity.value(spec.name).ok_or_else(|| unknown_field(entity, spec))
}

fn children_of<'a>(entity: &'a dyn Diffable, spec: &FieldSpec) -> Result<Vec<&'a dyn Diffable>> {
    entity.children(spec.name).ok_or_else(|| unknown_field(entity, spec))
}

fn unknown_field(entity: &dyn Diffable, spec: &FieldSpec) -> DiffError {
    DiffError::UnknownField {
        kind: entity.kind(),
        field: spec.name,
        field_kind: spec.kind.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use couchplan_core::{Bucket, Cluster, Datacenter, Identity};

    use super::*;

    struct Path(String);

    impl PathIdentifier for Path {
        fn path(&self) -> String {
            self.0.clone()
        }
    }

    fn owned(paths: &[&str]) -> Vec<Path> {
        paths.iter().map(|p| Path(p.to_string())).collect()
    }

    fn names<'a>(items: impl IntoIterator<Item = &'a Path>) -> Vec<&'a str> {
        items.into_iter().map(|p| p.0.as_str()).collect()
    }

    #[test]
    fn test_match_children() {
        type Case = (&'static [&'static str], &'static [&'static str]);
        let cases: [(Case, Case, &[&str]); 5] = [
            ((&["SAME"], &["SAME"]), (&[], &[]), &["SAME"]),
            ((&[], &["ANEW"]), (&["ANEW"], &[]), &[]),
            ((&["Remain"], &["Remain", "ANEW"]), (&["ANEW"], &[]), &["Remain"]),
            ((&["Del"], &[]), (&[], &["Del"]), &[]),
            ((&["Del", "cur"], &["cur", "New"]), (&["New"], &["Del"]), &["cur"]),
        ];

        for ((current, proposed), (added, deleted), same) in cases {
            let (current, proposed) = (owned(current), owned(proposed));
            let current: Vec<&Path> = current.iter().collect();
            let proposed: Vec<&Path> = proposed.iter().collect();

            let matched = match_children(&current, &proposed);
            assert_eq!(names(matched.same.iter().map(|(c, _)| *c)), same);
            assert_eq!(names(matched.added.iter().copied()), added);
            assert_eq!(names(matched.deleted.iter().copied()), deleted);
        }
    }

    #[test]
    fn test_duplicate_path_keeps_last() {
        let (a, b) = (Path("dup".into()), Path("dup".into()));
        let matched = match_children(&[&a, &b], &[&a]);
        assert_eq!(matched.same.len(), 1);
        assert!(std::ptr::eq(matched.same[0].0, &b));
    }

    fn cluster(buckets: Vec<Bucket>) -> Cluster {
        let identity = Identity::datacenter("DC1").with_cluster_group("CG_PK1");
        let bucket_identity = identity.clone().with_cluster("Booking_A");
        Cluster {
            name: "Booking".into(),
            instance: "A".into(),
            identity,
            buckets: buckets
                .into_iter()
                .map(|b| Bucket { identity: bucket_identity.clone(), ..b })
                .collect(),
            ..Cluster::default()
        }
    }

    #[test]
    fn test_value_change() {
        let current = cluster(vec![Bucket::new("Hyatt").with_ram_quota(256)]);
        let proposed = cluster(vec![Bucket::new("Hyatt").with_ram_quota(512)]);

        let node = diff(&current, &proposed).unwrap();
        let change = &node.compositions["buckets"];
        assert!(change.added.is_empty() && change.deleted.is_empty());
        assert_eq!(change.modified.len(), 1);

        let bucket = &change.modified[0];
        assert_eq!(bucket.path, "DC1_CG_PK1_Booking_A_Hyatt");
        assert_eq!(
            bucket.values["ramQuota"],
            ValueChange { current: FieldValue::Number(256), proposed: FieldValue::Number(512) }
        );
    }

    #[test]
    fn test_unchanged_children_are_suppressed() {
        let current = cluster(vec![Bucket::new("Hyatt"), Bucket::new("Campanile")]);
        let mut proposed = current.clone();
        proposed.buckets.reverse();

        assert!(diff(&current, &proposed).unwrap().is_empty());
    }

    #[test]
    fn test_identity_mismatch() {
        let err = diff(&Datacenter::new("DC1"), &Datacenter::new("DC2")).unwrap_err();
        assert_eq!(
            err,
            DiffError::IdentityMismatch { current: "DC1".into(), proposed: "DC2".into() }
        );
    }

    #[test]
    fn test_kind_mismatch() {
        // a bucket template has an empty identity, hence the leading separators
        let dc = Datacenter::new("___Hyatt");
        let bucket = Bucket::new("Hyatt");
        let err = diff(&dc, &bucket).unwrap_err();
        assert!(matches!(err, DiffError::KindMismatch { current: "Datacenter", .. }));
        assert!(err.is_usage_error());
    }
}
