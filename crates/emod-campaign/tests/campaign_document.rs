use emod_campaign::{
    scheduled_campaign_event, typhoid_vaccine, CampaignBuilder, EventTargeting, Repetition,
    VaccineOpts,
};
use emod_schema::Schema;
use serde_json::{json, Value};
use tempfile::tempdir;

fn sample_event(schema: &Schema, start_day: f64) -> emod_schema::ConfigNode {
    let iv = typhoid_vaccine(schema, &VaccineOpts::default()).expect("vaccine");
    scheduled_campaign_event(
        schema,
        start_day,
        &EventTargeting::default(),
        &Repetition::default(),
        vec![iv],
        None,
    )
    .expect("event")
}

#[test]
fn document_wraps_events_with_use_defaults() {
    let schema = Schema::builtin();
    let mut campaign = CampaignBuilder::new(schema.clone()).with_name("seattle");
    campaign.add(&sample_event(&schema, 10.0)).expect("add");
    campaign.add(&sample_event(&schema, 20.0)).expect("add");

    let doc = campaign.to_document();
    assert_eq!(doc["Campaign_Name"], json!("seattle"));
    assert_eq!(doc["Use_Defaults"], json!(1));
    let events = doc["Events"].as_array().expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["Start_Day"], json!(10.0));
    assert_eq!(events[1]["Start_Day"], json!(20.0));
}

#[test]
fn only_campaign_events_are_accepted() {
    let schema = Schema::builtin();
    let mut campaign = CampaignBuilder::new(schema.clone());
    let iv = typhoid_vaccine(&schema, &VaccineOpts::default()).expect("vaccine");
    let err = campaign.add(&iv).unwrap_err();
    assert_eq!(err.info().code, "campaign-not-event");
    assert!(campaign.events().is_empty());
}

#[test]
fn saved_campaign_reloads_identically() {
    let schema = Schema::builtin();
    let mut campaign = CampaignBuilder::new(schema.clone());
    campaign.add(&sample_event(&schema, 5.0)).expect("add");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("campaign.json");
    campaign.save(&path).expect("save");

    let raw = std::fs::read_to_string(&path).expect("read");
    let reloaded: Value = serde_json::from_str(&raw).expect("parse");
    assert_eq!(reloaded, campaign.to_document());
}
