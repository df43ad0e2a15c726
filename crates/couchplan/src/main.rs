// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Couchplan: Couchbase topology and XDCR planning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use couchplan_core::{Config, Datacenter, Format, LogFormat};
use couchplan_diff::{diff, report};
use couchplan_xdcr::{derive_all, Edge};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod graph;
mod loader;
mod plan;

use cli::{Cli, Commands, DiffArgs, OutputFormat, PlanArgs, TopologyArgs, TopologyFormat};
use cli::{XdcrArgs, XdcrFormat};
use plan::PlanDocument;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("couchplan {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = load_config(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config)?;

    match cli.command {
        Commands::Topology(args) => run_topology(&config, args),
        Commands::Xdcr(args) => run_xdcr(&config, args),
        Commands::Diff(args) => run_diff(args),
        Commands::Plan(args) => run_plan(&config, args),
        Commands::Version => Ok(()),
    }
}

fn run_topology(config: &Config, args: TopologyArgs) -> Result<()> {
    let blueprint = loader::load_blueprint(&args.def, args.env.as_deref())?;
    let datacenters =
        loader::build_datacenters(&blueprint, &args.datacenter, args.tag.as_deref());

    info!(
        blueprint = %args.def.display(),
        datacenters = datacenters.len(),
        buckets = datacenters.iter().map(|dc| dc.buckets().count()).sum::<usize>(),
        "Instantiated topology"
    );

    let format = args.format.unwrap_or(match config.output.topology_format {
        Format::Json => TopologyFormat::Json,
        Format::Yaml => TopologyFormat::Yaml,
    });
    match format {
        TopologyFormat::Dot => print!("{}", graph::render(&config.graph, &datacenters, &[])),
        TopologyFormat::Json => print_datacenters(Format::Json, &datacenters)?,
        TopologyFormat::Yaml => print_datacenters(Format::Yaml, &datacenters)?,
    }
    Ok(())
}

/// Print one datacenter as a single document, several as a list.
fn print_datacenters(format: Format, datacenters: &[Datacenter]) -> Result<()> {
    let text = match datacenters {
        [single] => format.encode(single),
        many => format.encode(&many),
    }
    .context("Failed to encode topology")?;
    println!("{}", text.trim_end());
    Ok(())
}

fn run_xdcr(config: &Config, args: XdcrArgs) -> Result<()> {
    let blueprint = loader::load_xdcr_blueprint(&args.rules, args.env.as_deref())?;
    let datacenters = load_datacenters(&args.topology)?;

    let links = derive_all(&blueprint.rules, &datacenters);
    info!(rules = blueprint.rules.len(), links = links.len(), "Derived XDCR links");

    match args.format {
        XdcrFormat::Text => {
            for link in &links {
                println!("{link}");
            }
        }
        XdcrFormat::Json => {
            let edges: Vec<Edge> = links.iter().map(|link| link.edge()).collect();
            println!("{}", serde_json::to_string_pretty(&edges)?);
        }
        XdcrFormat::Dot => {
            let edges: Vec<Edge> = links.iter().map(|link| link.edge()).collect();
            print!("{}", graph::render(&config.graph, &datacenters, &edges));
        }
    }
    Ok(())
}

fn load_datacenters(paths: &[PathBuf]) -> Result<Vec<Datacenter>> {
    paths.iter().map(|path| loader::load_datacenter(path)).collect()
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let current = loader::load_datacenter(&args.current)?;
    let proposed = loader::load_datacenter(&args.proposed)?;

    let node = diff(&current, &proposed).with_context(|| {
        format!("Cannot diff {} against {}", args.current.display(), args.proposed.display())
    })?;
    info!(datacenter = %current.name, changes = node.change_count(), "Computed diff");

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&node)?),
        OutputFormat::Text => {
            for line in report(&node) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn run_plan(config: &Config, args: PlanArgs) -> Result<()> {
    let document = PlanDocument::from_file(&args.file)?;
    let base = args.file.parent().unwrap_or_else(|| Path::new("."));
    let outcome = document.run(base)?;
    print!("{}", graph::render(&config.graph, &outcome.datacenters, &outcome.edges));
    Ok(())
}

fn load_config(path: &Option<PathBuf>) -> Result<Config> {
    Config::load(path.as_deref()).context("Failed to load configuration")
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt_layer.json()).init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        }
    }

    Ok(())
}
