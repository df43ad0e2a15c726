// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Structural diff between two versions of a topology.
//!
//! Every entity declares a schema of value fields (compared by equality) and
//! composition fields (child lists matched by path and diffed recursively).
//! A renamed child changes path and shows up as a deletion plus an addition;
//! an edited child keeps its path and shows up as a modification.
//!
//! # Example
//!
//! ```
//! use couchplan_core::{BucketTemplate, ClusterDef, ClusterGroupDef, Datacenter};
//! use couchplan_diff::diff_report;
//!
//! let def = |quota| {
//!     ClusterGroupDef::new("CG").with_peak_tokens(["PK1"]).with_cluster(
//!         ClusterDef::new("Booking")
//!             .with_instances(["A"])
//!             .with_bucket(BucketTemplate::new("Hyatt").with_ram_quota(quota)),
//!     )
//! };
//!
//! let mut current = Datacenter::new("DC1");
//! current.add_cluster_group_def(&def(256));
//! let mut proposed = Datacenter::new("DC1");
//! proposed.add_cluster_group_def(&def(512));
//!
//! let lines = diff_report(&current, &proposed).unwrap();
//! assert_eq!(lines, vec!["DC1_CG_PK1_Booking_A_Hyatt.ramQuota: 256 -> 512"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compare;
pub mod error;
pub mod node;
pub mod report;
pub mod schema;

pub use compare::{diff, match_children, ChildMatch};
pub use error::{DiffError, Result};
pub use node::{CompositionChange, DiffNode, ValueChange};
pub use report::{diff_report, report};
pub use schema::{Diffable, FieldKind, FieldSpec, FieldValue};
