// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Loading of blueprints and concrete topologies from disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use couchplan_core::{read_document, Datacenter, EnvData, TopologyBlueprint};
use couchplan_xdcr::XdcrBlueprint;
use tracing::debug;

/// A document reference of the form `file[+envFile]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentSpec {
    /// Document path.
    pub path: PathBuf,
    /// Optional environment file applied to the document.
    pub env: Option<PathBuf>,
}

impl DocumentSpec {
    /// Resolve relative paths against `base`.
    #[must_use]
    pub fn relative_to(self, base: &Path) -> Self {
        Self { path: base.join(self.path), env: self.env.map(|env| base.join(env)) }
    }
}

impl FromStr for DocumentSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (path, env) = match s.split_once('+') {
            Some((path, env)) => (path.trim(), Some(env.trim())),
            None => (s.trim(), None),
        };
        if path.is_empty() || env.is_some_and(str::is_empty) {
            bail!("Invalid document reference '{s}', expected file[+envFile]");
        }
        Ok(Self { path: PathBuf::from(path), env: env.map(PathBuf::from) })
    }
}

impl fmt::Display for DocumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(env) = &self.env {
            write!(f, "+{}", env.display())?;
        }
        Ok(())
    }
}

/// Load an optional environment file.
pub fn load_env(path: Option<&Path>) -> Result<Option<EnvData>> {
    path.map(|path| {
        EnvData::from_file(path)
            .with_context(|| format!("Failed to load environment file {}", path.display()))
    })
    .transpose()
}

/// Load and validate a topology blueprint.
pub fn load_blueprint(path: &Path, env: Option<&Path>) -> Result<TopologyBlueprint> {
    let env = load_env(env)?;
    let blueprint: TopologyBlueprint = read_document(path, env.as_ref())
        .with_context(|| format!("Failed to load topology blueprint {}", path.display()))?;
    blueprint
        .validate()
        .with_context(|| format!("Invalid topology blueprint {}", path.display()))?;
    debug!(
        path = %path.display(),
        cluster_groups = blueprint.cluster_groups.len(),
        "Loaded topology blueprint"
    );
    Ok(blueprint)
}

/// Load an XDCR blueprint.
pub fn load_xdcr_blueprint(path: &Path, env: Option<&Path>) -> Result<XdcrBlueprint> {
    let env = load_env(env)?;
    let blueprint: XdcrBlueprint = read_document(path, env.as_ref())
        .with_context(|| format!("Failed to load XDCR blueprint {}", path.display()))?;
    debug!(path = %path.display(), rules = blueprint.rules.len(), "Loaded XDCR blueprint");
    Ok(blueprint)
}

/// Load a concrete datacenter tree.
pub fn load_datacenter(path: &Path) -> Result<Datacenter> {
    let datacenter: Datacenter = read_document(path, None)
        .with_context(|| format!("Failed to load datacenter {}", path.display()))?;
    debug!(
        path = %path.display(),
        datacenter = %datacenter.name,
        cluster_groups = datacenter.cluster_groups.len(),
        "Loaded datacenter"
    );
    Ok(datacenter)
}

/// Instantiate a blueprint into freshly created datacenters.
#[must_use]
pub fn build_datacenters(
    blueprint: &TopologyBlueprint,
    names: &[String],
    tag: Option<&str>,
) -> Vec<Datacenter> {
    names
        .iter()
        .map(|name| {
            let mut dc = Datacenter::new(name.as_str());
            if let Some(tag) = tag {
                dc = dc.with_version(tag);
            }
            dc.add_blueprint(blueprint);
            dc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use couchplan_core::PathIdentifier;
    use tempfile::TempDir;

    use super::*;

    const BLUEPRINT: &str = r#"
clusterGroups:
  - name: CG
    peakToken: [PK1]
    labels: { Site: __SITE__ }
    clusters:
      - name: Booking
        instances: [A, B]
        buckets:
          - name: Hyatt
            ramQuota: 256
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_document_spec_parse() {
        let spec: DocumentSpec = "topo.yaml".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("topo.yaml"));
        assert!(spec.env.is_none());

        let spec: DocumentSpec = "topo.yaml+prod.yaml".parse().unwrap();
        assert_eq!(spec.env, Some(PathBuf::from("prod.yaml")));
        assert_eq!(spec.to_string(), "topo.yaml+prod.yaml");

        assert!("".parse::<DocumentSpec>().is_err());
        assert!("topo.yaml+".parse::<DocumentSpec>().is_err());
        assert!("+prod.yaml".parse::<DocumentSpec>().is_err());
    }

    #[test]
    fn test_relative_to() {
        let spec: DocumentSpec = "topo.yaml+prod.yaml".parse().unwrap();
        let spec = spec.relative_to(Path::new("plans"));
        assert_eq!(spec.path, PathBuf::from("plans/topo.yaml"));
        assert_eq!(spec.env, Some(PathBuf::from("plans/prod.yaml")));
    }

    #[test]
    fn test_load_blueprint_with_env() {
        let dir = TempDir::new().unwrap();
        let def = write(&dir, "topo.yaml", BLUEPRINT);
        let env = write(&dir, "prod.yaml", "replacements:\n  __SITE__: Paris\n");

        let blueprint = load_blueprint(&def, Some(&env)).unwrap();
        assert_eq!(blueprint.cluster_groups[0].labels.get("Site"), Some("Paris"));

        let raw = load_blueprint(&def, None).unwrap();
        assert_eq!(raw.cluster_groups[0].labels.get("Site"), Some("__SITE__"));
    }

    #[test]
    fn test_load_blueprint_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        let err = load_blueprint(&missing, None).unwrap_err();
        assert!(err.to_string().contains("Failed to load topology blueprint"));

        let unnamed = write(&dir, "bad.yaml", "clusterGroups:\n  - name: \"\"\n");
        let err = load_blueprint(&unnamed, None).unwrap_err();
        assert!(err.to_string().contains("Invalid topology blueprint"));

        let toml = write(&dir, "topo.toml", "");
        assert!(load_blueprint(&toml, None).is_err());
    }

    #[test]
    fn test_build_and_reload_datacenters() {
        let dir = TempDir::new().unwrap();
        let def = write(&dir, "topo.yaml", BLUEPRINT);
        let blueprint = load_blueprint(&def, None).unwrap();

        let names = vec!["DC1".to_string(), "DC2".to_string()];
        let dcs = build_datacenters(&blueprint, &names, Some("v1"));
        assert_eq!(dcs.len(), 2);
        assert_eq!(dcs[1].version, "v1");
        assert_eq!(dcs[1].buckets().count(), 2);

        let json = serde_json::to_string_pretty(&dcs[0]).unwrap();
        let path = write(&dir, "dc1.json", &json);
        let reloaded = load_datacenter(&path).unwrap();
        assert_eq!(reloaded, dcs[0]);
        assert_eq!(reloaded.buckets().next().unwrap().path(), "DC1_CG_PK1_Booking_A_Hyatt");
    }

    #[test]
    fn test_load_xdcr_blueprint() {
        let dir = TempDir::new().unwrap();
        let rules =
            write(&dir, "xdcr.yaml", "xdcrDefs:\n  - rule: ring\n    source: { name: __B__ }\n");
        let env = write(&dir, "env.json", r#"{"replacements": {"__B__": "Hyatt"}}"#);

        let blueprint = load_xdcr_blueprint(&rules, Some(&env)).unwrap();
        assert_eq!(blueprint.rules.len(), 1);

        let chain = write(&dir, "chain.yaml", "xdcrDefs:\n  - rule: chain\n    source: {}\n");
        assert!(load_xdcr_blueprint(&chain, None).is_err());
    }
}
