// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Plan documents: topologies and XDCR rules applied to named datacenters.
//!
//! ```yaml
//! topos:
//!   couchbase.yaml+prod.yaml: [DC1, DC2]
//! xdcrs:
//!   xdcr.yaml: [DC1, DC2]
//! ```
//!
//! Keys are `file[+envFile]` references resolved against the directory of the
//! plan document. Every XDCR rule file is derived over the union of the
//! buckets of its listed datacenters.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use couchplan_core::{read_document, Datacenter};
use couchplan_xdcr::{derive_all, Edge};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::loader::{load_blueprint, load_xdcr_blueprint, DocumentSpec};

/// A plan document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Topology blueprints mapped to the datacenters they are instantiated into.
    #[serde(default, alias = "Topos")]
    pub topos: BTreeMap<String, Vec<String>>,
    /// XDCR blueprints mapped to the datacenters they are derived over.
    #[serde(default, alias = "XDCRs")]
    pub xdcrs: BTreeMap<String, Vec<String>>,
}

/// Result of running a plan.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    /// Datacenters, in order of first mention.
    pub datacenters: Vec<Datacenter>,
    /// Derived links, per rule file in key order.
    pub edges: Vec<Edge>,
}

impl PlanDocument {
    /// Load a plan document.
    pub fn from_file(path: &Path) -> Result<Self> {
        read_document(path, None)
            .with_context(|| format!("Failed to load plan document {}", path.display()))
    }

    /// Instantiate every topology, then derive every rule file.
    ///
    /// Keys are processed in lexicographic order. A datacenter receiving
    /// several topologies accumulates their cluster groups.
    pub fn run(&self, base: &Path) -> Result<PlanOutcome> {
        let mut outcome = PlanOutcome::default();

        for (key, names) in &self.topos {
            let spec = resolve(key, base)?;
            let blueprint = load_blueprint(&spec.path, spec.env.as_deref())?;
            for name in names {
                let index = match outcome.datacenters.iter().position(|dc| &dc.name == name) {
                    Some(index) => index,
                    None => {
                        outcome.datacenters.push(Datacenter::new(name.as_str()));
                        outcome.datacenters.len() - 1
                    }
                };
                outcome.datacenters[index].add_blueprint(&blueprint);
                debug!(topology = %spec, datacenter = %name, "Applied topology");
            }
        }

        for (key, names) in &self.xdcrs {
            let spec = resolve(key, base)?;
            let blueprint = load_xdcr_blueprint(&spec.path, spec.env.as_deref())?;
            let selected = names
                .iter()
                .map(|name| {
                    outcome
                        .datacenters
                        .iter()
                        .find(|dc| &dc.name == name)
                        .cloned()
                        .with_context(|| format!("Unknown datacenter '{name}' in {spec}"))
                })
                .collect::<Result<Vec<Datacenter>>>()?;

            let links = derive_all(&blueprint.rules, &selected);
            debug!(rules = %spec, links = links.len(), "Derived XDCR links");
            outcome.edges.extend(links.iter().map(|link| link.edge()));
        }

        info!(
            datacenters = outcome.datacenters.len(),
            links = outcome.edges.len(),
            "Plan completed"
        );
        Ok(outcome)
    }
}

fn resolve(key: &str, base: &Path) -> Result<DocumentSpec> {
    let spec: DocumentSpec = key.parse()?;
    Ok(spec.relative_to(base))
}
