use std::io::Write;

use emod_demog::Demographics;
use serde_json::{json, Value};
use tempfile::{tempdir, NamedTempFile};

#[test]
fn template_node_document_shape() {
    let demog = Demographics::from_template_node(47.6, -122.3, 10_000, "seattle", 1);
    let doc = demog.to_document().expect("document");

    assert_eq!(doc["Metadata"]["Tool"], json!("emod-demog"));
    assert_eq!(doc["Metadata"]["IdReference"], json!("Gridded world grump2.5arcmin"));
    assert_eq!(doc["Metadata"]["NodeCount"], json!(1));
    assert!(doc["Metadata"]["DateCreated"].is_string());

    let attrs = &doc["Defaults"]["IndividualAttributes"];
    assert_eq!(attrs["AgeDistributionFlag"], json!(1));
    assert_eq!(attrs["AgeDistribution2"], json!(18250));

    let node = &doc["Nodes"][0];
    assert_eq!(node["NodeID"], json!(1));
    assert_eq!(node["NodeAttributes"]["Latitude"], json!(47.6));
    assert_eq!(node["NodeAttributes"]["InitialPopulation"], json!(10_000));
    assert_eq!(node["NodeAttributes"]["FacilityName"], json!("seattle"));
}

#[test]
fn duplicate_node_ids_are_rejected() {
    let mut file = NamedTempFile::new().expect("tempfile");
    file.write_all(b"lat,lon,pop,node_id\n0.0,0.0,100,5\n1.0,1.0,200,5\n")
        .expect("write");
    file.flush().expect("flush");
    let demog = Demographics::from_csv(file.path(), "site", 0).expect("import");
    let err = demog.to_document().unwrap_err();
    assert_eq!(err.info().code, "demog-duplicate-id");
    assert_eq!(err.info().context.get("node_id").map(String::as_str), Some("5"));
}

#[test]
fn saved_document_reparses() {
    let demog = Demographics::from_params(10_000, 4, 0.5, "synthetic", 3).expect("build");
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("demographics.json");
    demog.save(&path).expect("save");

    let raw = std::fs::read_to_string(&path).expect("read");
    let doc: Value = serde_json::from_str(&raw).expect("parse");
    assert_eq!(doc["Nodes"].as_array().map(Vec::len), Some(4));
    assert_eq!(doc["Metadata"]["IdReference"], json!("synthetic"));
}
