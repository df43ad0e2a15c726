// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Flat text rendering of a diff tree.
//!
//! Lines have one of three shapes:
//!
//! ```text
//! <path>.<field>: <old> -> <new>
//! <path>.<field>: New=<childPath>
//! <path>.<field>: Deleted=<childPath>
//! ```

use crate::compare::diff;
use crate::error::Result;
use crate::node::DiffNode;
use crate::schema::Diffable;

/// Render a diff tree depth-first.
///
/// Within a node, value changes come first, then each composition field in
/// name order: additions, deletions, then the modified children by path.
#[must_use]
pub fn report(node: &DiffNode) -> Vec<String> {
    let mut lines = Vec::new();
    render(node, &mut lines);
    lines
}

fn render(node: &DiffNode, lines: &mut Vec<String>) {
    for (field, change) in &node.values {
        lines.push(format!("{}.{field}: {} -> {}", node.path, change.current, change.proposed));
    }
    for (field, change) in &node.compositions {
        for path in &change.added {
            lines.push(format!("{}.{field}: New={path}", node.path));
        }
        for path in &change.deleted {
            lines.push(format!("{}.{field}: Deleted={path}", node.path));
        }
        for child in &change.modified {
            render(child, lines);
        }
    }
}

/// Diff two versions of an entity and render the result.
///
/// # Errors
///
/// Fails like [`diff`] when the two roots cannot be compared.
pub fn diff_report(current: &dyn Diffable, proposed: &dyn Diffable) -> Result<Vec<String>> {
    diff(current, proposed).map(|node| report(&node))
}
