// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! XDCR rule definitions.
//!
//! # Example YAML
//!
//! ```yaml
//! xdcrDefs:
//!   - rule: custom
//!     bidirectional: true
//!     source: { Company: Hyatt }
//!     sourceExclude: { ReadOnly: "true" }
//!     destination: { Company: Hyatt, ReadOnly: "true" }
//!     groupOn: [Cluster, ClusterGroup, Datacenter]
//!     args: []
//!     color: blue
//! ```

use couchplan_core::Selector;
use serde::{Deserialize, Serialize};

use crate::link::LinkScope;
use crate::rule::XdcrRule;

/// Definition of one XDCR rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XdcrDef {
    /// Link shape.
    pub rule: XdcrRule,
    /// Emit the reverse of every link too (see the builders for the ring exception).
    #[serde(default)]
    pub bidirectional: bool,
    /// Buckets feeding the rule.
    pub source: Selector,
    /// Buckets removed from the sources. Absent means nothing is removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_exclude: Option<Selector>,
    /// Destination buckets (used by `custom`). Absent means no destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Selector>,
    /// Buckets removed from the destinations. Absent means nothing is removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_exclude: Option<Selector>,
    /// Label keys partitioning buckets into independent replication groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_on: Vec<String>,
    /// Replication arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Arguments for links between clusters of one cluster group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args_x_cluster: Vec<String>,
    /// Arguments for links between cluster groups of one datacenter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args_x_cluster_group: Vec<String>,
    /// Arguments for links between datacenters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args_x_datacenter: Vec<String>,
    /// Display color of the derived links.
    #[serde(default)]
    pub color: String,
}

impl XdcrDef {
    /// Create a rule selecting `source`.
    #[must_use]
    pub fn new(rule: XdcrRule, source: Selector) -> Self {
        Self {
            rule,
            bidirectional: false,
            source,
            source_exclude: None,
            destination: None,
            destination_exclude: None,
            group_on: Vec::new(),
            args: Vec::new(),
            args_x_cluster: Vec::new(),
            args_x_cluster_group: Vec::new(),
            args_x_datacenter: Vec::new(),
            color: String::new(),
        }
    }

    /// Set the bidirectional flag.
    #[must_use]
    pub fn bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    /// Set the source exclusion selector.
    #[must_use]
    pub fn with_source_exclude(mut self, selector: Selector) -> Self {
        self.source_exclude = Some(selector);
        self
    }

    /// Set the destination selector.
    #[must_use]
    pub fn with_destination(mut self, selector: Selector) -> Self {
        self.destination = Some(selector);
        self
    }

    /// Set the destination exclusion selector.
    #[must_use]
    pub fn with_destination_exclude(mut self, selector: Selector) -> Self {
        self.destination_exclude = Some(selector);
        self
    }

    /// Set the grouping keys.
    #[must_use]
    pub fn with_group_on<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_on = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the link color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Arguments for a link of the given scope.
    ///
    /// Scope-specific arguments win when set; otherwise [`XdcrDef::args`] applies.
    #[must_use]
    pub fn args_for(&self, scope: LinkScope) -> &[String] {
        let specific = match scope {
            LinkScope::IntraCluster => &self.args,
            LinkScope::CrossCluster => &self.args_x_cluster,
            LinkScope::CrossClusterGroup => &self.args_x_cluster_group,
            LinkScope::CrossDatacenter => &self.args_x_datacenter,
        };
        if specific.is_empty() {
            &self.args
        } else {
            specific
        }
    }
}

/// Top-level XDCR document listing one or several rule definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XdcrBlueprint {
    /// Rule definitions, applied in order.
    #[serde(rename = "xdcrDefs", alias = "xdcrdefs", alias = "XDCRDefs", default)]
    pub rules: Vec<XdcrDef>,
}
