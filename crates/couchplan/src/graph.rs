// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Graph description (DOT) of topologies and XDCR links.
//!
//! Every datacenter, cluster group and cluster becomes a clustered subgraph,
//! every bucket a node, every link an edge:
//!
//! ```text
//! digraph {
//!   subgraph "cluster_DC1" {
//!     label="DC1";
//!     subgraph "cluster_DC1_CG_PK1" {
//!       label="CG PK1";
//!       ...
//!   "DC1_CG_PK1_Booking_A_Hyatt" -> "DC2_CG_PK1_Booking_A_Hyatt" [color="red"];
//! }
//! ```

use std::collections::BTreeMap;

use couchplan_core::{Bucket, Cluster, ClusterGroup, Datacenter, GraphConfig, PathIdentifier};
use couchplan_xdcr::{Edge, LEVEL_LABEL};

/// Quote a DOT identifier.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Incremental writer of one graph description.
#[derive(Debug)]
pub struct GraphWriter<'c> {
    config: &'c GraphConfig,
    out: String,
    depth: usize,
    /// First bucket path seen for each `Level` label value.
    levels: BTreeMap<String, String>,
}

impl<'c> GraphWriter<'c> {
    /// Start a new graph.
    #[must_use]
    pub fn new(config: &'c GraphConfig) -> Self {
        let mut writer = Self { config, out: String::new(), depth: 0, levels: BTreeMap::new() };
        writer.open("digraph");
        writer
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn subgraph(&mut self, path: &str, label: &str) {
        self.open(&format!("subgraph {}", quote(&format!("cluster_{path}"))));
        self.line(&format!("label={};", quote(label)));
    }

    /// Write a datacenter and everything it contains.
    pub fn datacenter(&mut self, datacenter: &Datacenter) {
        self.subgraph(&datacenter.path(), &datacenter.name);
        for group in &datacenter.cluster_groups {
            self.cluster_group(group);
        }
        self.close();
    }

    fn cluster_group(&mut self, group: &ClusterGroup) {
        self.subgraph(&group.path(), &format!("{} {}", group.name, group.peak_token));
        for cluster in &group.clusters {
            self.cluster(cluster);
        }
        self.close();
    }

    fn cluster(&mut self, cluster: &Cluster) {
        self.subgraph(&cluster.path(), &format!("{} {}", cluster.name, cluster.instance));
        for bucket in &cluster.buckets {
            self.bucket(bucket);
        }
        self.close();
    }

    fn bucket(&mut self, bucket: &Bucket) {
        let path = bucket.path();
        self.line(&format!("{} [label={}];", quote(&path), quote(&bucket.name)));

        if !self.config.rank_levels {
            return;
        }
        if let Some(level) = bucket.labels.get(LEVEL_LABEL) {
            match self.levels.get(level) {
                Some(first) => {
                    let rank = format!("{{rank=same; {} {}}}", quote(&path), quote(first));
                    self.line(&rank);
                }
                None => {
                    self.levels.insert(level.to_string(), path);
                }
            }
        }
    }

    /// Write one edge, falling back to the configured color.
    pub fn edge(&mut self, edge: &Edge) {
        let color = if edge.color.is_empty() { &self.config.default_color } else { &edge.color };
        let line = format!(
            "{} -> {} [color={}];",
            quote(&edge.source),
            quote(&edge.destination),
            quote(color)
        );
        self.line(&line);
    }

    /// Close the graph and return its text.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.close();
        self.out
    }
}

/// Render datacenters and edges as one graph.
#[must_use]
pub fn render(config: &GraphConfig, datacenters: &[Datacenter], edges: &[Edge]) -> String {
    let mut writer = GraphWriter::new(config);
    for datacenter in datacenters {
        writer.datacenter(datacenter);
    }
    for edge in edges {
        writer.edge(edge);
    }
    writer.finish()
}
