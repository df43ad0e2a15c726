// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Cross-datacenter replication (XDCR) link derivation.
//!
//! An [`XdcrDef`] selects buckets by label, partitions them into replication
//! groups by their `groupOn` labels, and links each group according to its
//! [`XdcrRule`]:
//!
//! - `ring`: a cycle through the sources sorted by path
//! - `tree`: parent to child between adjacent `Level` values
//! - `uptree`: child to parent between adjacent `Level` values
//! - `custom`: every source to every destination
//!
//! # Example
//!
//! ```
//! use couchplan_core::{BucketTemplate, ClusterDef, ClusterGroupDef, Datacenter, Selector};
//! use couchplan_xdcr::{derive_xdcr, XdcrDef, XdcrRule};
//!
//! let mut dc = Datacenter::new("DC1");
//! dc.add_cluster_group_def(
//!     &ClusterGroupDef::new("CG").with_peak_tokens(["PK1"]).with_cluster(
//!         ClusterDef::new("Booking")
//!             .with_instances(["A", "B", "C"])
//!             .with_bucket(BucketTemplate::new("Hyatt")),
//!     ),
//! );
//!
//! let def = XdcrDef::new(XdcrRule::Ring, Selector::new().with("name", "Hyatt"));
//! let datacenters = [dc];
//! assert_eq!(derive_xdcr(&def, &datacenters).len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod definition;
pub mod engine;
pub mod link;
pub mod partition;
pub mod rule;

pub use builder::LEVEL_LABEL;
pub use definition::{XdcrBlueprint, XdcrDef};
pub use engine::{derive_all, derive_xdcr};
pub use link::{Edge, LinkScope, XdcrLink};
pub use partition::{partition, ReplicationGroup};
pub use rule::XdcrRule;
