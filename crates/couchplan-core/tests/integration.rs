// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (c) 2025 The Couchplan Authors

//! Integration tests for blueprint decoding and instantiation.

use couchplan_core::{
    group_hash, read_document, Config, Datacenter, EnvData, Format, LabelSource, Labels,
    PathIdentifier, Selector, TopologyBlueprint,
};

const BLUEPRINT: &str = r#"
clusterGroups:
  - name: CG
    peakToken: [PK1, PK2]
    labels: { Site: __SITE__ }
    clusters:
      - name: Booking
        instances: [A, B]
        labels: { Tier: front }
        buckets:
          - name: Hyatt
            ramQuota: 256
            cbReplicatNumber: 1
            labels: { Company: Hyatt }
          - name: Campanile
            labels: { Company: Campanile }
  - name: Empty
    peakToken: []
"#;

#[test]
fn test_exports() {
    let _ = Config::default();
    let _ = Format::Yaml;
    let _ = Labels::new();
    let _ = Selector::new();
    let _ = EnvData::default();
    let _ = TopologyBlueprint::default();
}

fn blueprint() -> TopologyBlueprint {
    let env = EnvData { replacements: Labels::new().with("__SITE__", "Paris") };
    let blueprint: TopologyBlueprint = Format::Yaml.decode(&env.apply(BLUEPRINT)).unwrap();
    blueprint.validate().unwrap();
    blueprint
}

#[test]
fn test_instantiate_blueprint() {
    let mut dc = Datacenter::new("DC1");
    dc.add_blueprint(&blueprint());

    // 2 peak tokens x 2 instances x 2 buckets; the group without tokens yields nothing
    assert_eq!(dc.cluster_groups.len(), 2);
    assert_eq!(dc.clusters().count(), 4);
    assert_eq!(dc.buckets().count(), 8);

    let paths: Vec<String> = dc.buckets().map(|b| b.path()).collect();
    assert_eq!(paths[0], "DC1_CG_PK1_Booking_A_Hyatt");
    assert_eq!(paths[7], "DC1_CG_PK2_Booking_B_Campanile");

    let group = &dc.cluster_groups[1];
    assert_eq!(group.labels.get("Site"), Some("Paris"));
    assert_eq!(group.clusters[0].labels.get("Tier"), Some("front"));

    let bucket = dc.buckets().next().unwrap();
    assert_eq!(bucket.ram_quota, 256);
    assert_eq!(bucket.replica_number, 1);
}

#[test]
fn test_effective_labels() {
    let mut dc = Datacenter::new("DC1");
    dc.add_blueprint(&blueprint());
    let bucket = dc.buckets().last().unwrap();

    assert_eq!(bucket.label("Datacenter"), Some("DC1"));
    assert_eq!(bucket.label("ClusterGroup"), Some("CG_PK2"));
    assert_eq!(bucket.label("Cluster"), Some("Booking_B"));
    assert_eq!(bucket.label("name"), Some("Campanile"));
    assert_eq!(bucket.label("Company"), Some("Campanile"));
    assert!(bucket.labels.get("Datacenter").is_none());

    let selector: Selector = [("Company", "Campanile"), ("ClusterGroup", "CG_PK2")]
        .into_iter()
        .collect();
    assert_eq!(dc.buckets().filter(|b| b.matches(Some(&selector))).count(), 2);

    let group_on = vec!["Cluster".to_string(), "name".to_string()];
    assert_eq!(group_hash(bucket, &group_on), "#Cluster:Booking_B#name:Campanile#");
}

#[test]
fn test_datacenter_document_roundtrip() {
    let mut dc = Datacenter::new("DC1").with_version("v3");
    dc.add_blueprint(&blueprint());

    let dir = tempfile::tempdir().unwrap();
    for format in [Format::Json, Format::Yaml] {
        let path = dir.path().join(format!("dc1.{format}"));
        std::fs::write(&path, format.encode(&dc).unwrap()).unwrap();
        let loaded: Datacenter = read_document(&path, None).unwrap();
        assert_eq!(loaded, dc);
    }
}

#[test]
fn test_invalid_blueprint() {
    let blueprint: TopologyBlueprint = Format::Json
        .decode(r#"{"clusterGroups": [{"name": "CG", "clusters": [{"name": ""}]}]}"#)
        .unwrap();
    let err = blueprint.validate().unwrap_err();
    assert!(err.to_string().contains("cluster group 'CG'"));
}
