// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Command line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Couchplan: plan Couchbase datacenter topologies and their XDCR links.
#[derive(Parser)]
#[command(name = "couchplan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overrides config).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Instantiate a topology blueprint into datacenters.
    Topology(TopologyArgs),
    /// Derive XDCR links over concrete datacenters.
    Xdcr(XdcrArgs),
    /// Diff two versions of a datacenter.
    Diff(DiffArgs),
    /// Run a plan document combining topologies and XDCR rules.
    Plan(PlanArgs),
    /// Print version information.
    Version,
}

/// Arguments for the topology command.
#[derive(Args)]
pub struct TopologyArgs {
    /// Topology blueprint (JSON or YAML).
    #[arg(short, long)]
    pub def: PathBuf,

    /// Environment file applied to the blueprint before decoding.
    #[arg(short, long)]
    pub env: Option<PathBuf>,

    /// Datacenters to instantiate the blueprint into.
    ///
    /// Example: --datacenter DC1,DC2
    #[arg(long, required = true, value_delimiter = ',')]
    pub datacenter: Vec<String>,

    /// Version tag recorded on every datacenter.
    #[arg(long)]
    pub tag: Option<String>,

    /// Output format (defaults to `output.topology_format` from config).
    #[arg(short, long)]
    pub format: Option<TopologyFormat>,
}

/// Arguments for the xdcr command.
#[derive(Args)]
pub struct XdcrArgs {
    /// XDCR blueprint (JSON or YAML).
    #[arg(short, long)]
    pub rules: PathBuf,

    /// Environment file applied to the blueprint before decoding.
    #[arg(short, long)]
    pub env: Option<PathBuf>,

    /// Concrete datacenter files, as printed by the topology command.
    #[arg(short, long, required = true, num_args = 1..)]
    pub topology: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "text")]
    pub format: XdcrFormat,
}

/// Arguments for the diff command.
#[derive(Args)]
pub struct DiffArgs {
    /// Current datacenter file.
    pub current: PathBuf,

    /// Proposed datacenter file.
    pub proposed: PathBuf,

    /// Output format (text, json).
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the plan command.
#[derive(Args)]
pub struct PlanArgs {
    /// Plan document (JSON or YAML).
    ///
    /// Keys are `file[+envFile]` specs, values the datacenters they apply to:
    ///
    ///   topos: { topo.yaml+prod.yaml: [DC1, DC2] }
    ///   xdcrs: { xdcr.yaml: [DC1, DC2] }
    pub file: PathBuf,
}

/// Output format for topologies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TopologyFormat {
    /// JSON tree.
    Json,
    /// YAML tree.
    Yaml,
    /// Graph description.
    Dot,
}

/// Output format for XDCR links.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum XdcrFormat {
    /// One line per link.
    #[default]
    Text,
    /// JSON list of edges.
    Json,
    /// Graph description including the topologies.
    Dot,
}

/// Output format for CLI commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}
