// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Core types for couchplan topology planning.
//!
//! This crate provides the building blocks shared by every couchplan component:
//! - Labels and selectors used to tag and pick buckets
//! - The entity hierarchy (Datacenter → ClusterGroup → Cluster → Bucket)
//! - Compact definitions and the instantiator that expands them
//! - Document decoding (JSON/YAML, environment replacements)
//! - Configuration and error types
//!
//! # Hierarchy
//!
//! ```text
//! Datacenter "DC1"
//!  └── ClusterGroup "CG" (peak token PK1)      path: DC1_CG_PK1
//!       └── Cluster "Booking" (instance A)      path: DC1_CG_PK1_Booking_A
//!            └── Bucket "Hyatt"                 path: DC1_CG_PK1_Booking_A_Hyatt
//! ```
//!
//! # Example
//!
//! ```
//! use couchplan_core::{BucketTemplate, ClusterDef, ClusterGroupDef, Datacenter};
//!
//! let def = ClusterGroupDef::new("CG")
//!     .with_peak_tokens(["PK1", "PK2"])
//!     .with_cluster(
//!         ClusterDef::new("Booking")
//!             .with_instances(["A", "B"])
//!             .with_bucket(BucketTemplate::new("Hyatt").with_label("Company", "Hyatt")),
//!     );
//!
//! let mut dc = Datacenter::new("DC1");
//! dc.add_cluster_group_def(&def);
//!
//! assert_eq!(dc.cluster_groups.len(), 2);
//! assert_eq!(dc.buckets().count(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod definition;
pub mod document;
pub mod error;
pub mod instantiate;
pub mod labels;
pub mod model;

pub use config::{Config, GraphConfig, LogFormat, LoggingConfig, OutputConfig};
pub use definition::{BucketTemplate, ClusterDef, ClusterGroupDef, TopologyBlueprint};
pub use document::{read_document, EnvData, Format};
pub use error::{Error, Result};
pub use instantiate::instantiate;
pub use labels::{group_hash, LabelSource, Labels, Selector};
pub use model::{Bucket, Cluster, ClusterGroup, Datacenter, Identity, PathIdentifier};
