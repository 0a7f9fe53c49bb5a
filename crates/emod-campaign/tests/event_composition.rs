use emod_campaign::{
    delayed_intervention, routine_immunization, routine_plus_catchup, scheduled_campaign_event,
    simple_vaccine, triggered_campaign_event, typhoid_vaccine, EventTargeting, Repetition,
    RoutineImmunizationOpts, RoutinePlusCatchupOpts, VaccineOpts,
};
use emod_schema::Schema;
use serde_json::{json, Value};

fn one_vaccine(schema: &Schema) -> Vec<emod_schema::ConfigNode> {
    vec![typhoid_vaccine(schema, &VaccineOpts::default()).expect("vaccine")]
}

#[test]
fn scheduled_event_has_coordinator_shape() {
    let schema = Schema::builtin();
    let targeting = EventTargeting {
        coverage: 0.8,
        property_restrictions: vec!["Region:A".to_string()],
        ..EventTargeting::default()
    };
    let event = scheduled_campaign_event(
        &schema,
        30.0,
        &targeting,
        &Repetition::default(),
        one_vaccine(&schema),
        None,
    )
    .expect("event");
    let value = event.to_value();
    assert_eq!(value["class"], json!("CampaignEvent"));
    assert_eq!(value["Start_Day"], json!(30.0));
    assert_eq!(value["Nodeset_Config"]["class"], json!("NodeSetAll"));
    let coordinator = &value["Event_Coordinator_Config"];
    assert_eq!(
        coordinator["class"],
        json!("StandardInterventionDistributionEventCoordinator")
    );
    assert_eq!(coordinator["Demographic_Coverage"], json!(0.8));
    assert_eq!(coordinator["Property_Restrictions"], json!(["Region:A"]));
    assert_eq!(coordinator["Intervention_Config"]["class"], json!("TyphoidVaccine"));
}

#[test]
fn node_ids_select_a_node_list() {
    let schema = Schema::builtin();
    let targeting = EventTargeting {
        node_ids: Some(vec![2, 5]),
        ..EventTargeting::default()
    };
    let event = scheduled_campaign_event(
        &schema,
        1.0,
        &targeting,
        &Repetition::default(),
        one_vaccine(&schema),
        None,
    )
    .expect("event");
    let nodeset = &event.to_value()["Nodeset_Config"];
    assert_eq!(nodeset["class"], json!("NodeSetNodeList"));
    assert_eq!(nodeset["Node_List"], json!([2, 5]));
}

#[test]
fn age_band_switches_target_demographic() {
    let schema = Schema::builtin();
    let targeting = EventTargeting {
        target_age_min: Some(0.75),
        target_age_max: Some(15.0),
        ..EventTargeting::default()
    };
    let event = scheduled_campaign_event(
        &schema,
        1.0,
        &targeting,
        &Repetition::default(),
        one_vaccine(&schema),
        None,
    )
    .expect("event");
    let coordinator = &event.to_value()["Event_Coordinator_Config"];
    assert_eq!(coordinator["Target_Demographic"], json!("ExplicitAgeRanges"));
    assert_eq!(coordinator["Target_Age_Min"], json!(0.75));
    assert_eq!(coordinator["Target_Age_Max"], json!(15.0));
}

#[test]
fn coverage_outside_unit_interval_is_rejected() {
    let schema = Schema::builtin();
    let targeting = EventTargeting {
        coverage: 1.2,
        ..EventTargeting::default()
    };
    let err = scheduled_campaign_event(
        &schema,
        1.0,
        &targeting,
        &Repetition::default(),
        one_vaccine(&schema),
        None,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "targeting-coverage");
}

#[test]
fn inverted_age_band_is_rejected() {
    let schema = Schema::builtin();
    let targeting = EventTargeting {
        target_age_min: Some(10.0),
        target_age_max: Some(2.0),
        ..EventTargeting::default()
    };
    let err = scheduled_campaign_event(
        &schema,
        1.0,
        &targeting,
        &Repetition::default(),
        one_vaccine(&schema),
        None,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "targeting-age-range");
}

#[test]
fn empty_intervention_list_is_rejected() {
    let schema = Schema::builtin();
    let err = scheduled_campaign_event(
        &schema,
        1.0,
        &EventTargeting::default(),
        &Repetition::default(),
        Vec::new(),
        None,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "event-no-interventions");
}

#[test]
fn co_event_appends_a_broadcast_in_a_multi_distributor() {
    let schema = Schema::builtin();
    let event = scheduled_campaign_event(
        &schema,
        1.0,
        &EventTargeting::default(),
        &Repetition::default(),
        one_vaccine(&schema),
        Some("VaccineDistributed"),
    )
    .expect("event");
    let payload = &event.to_value()["Event_Coordinator_Config"]["Intervention_Config"];
    assert_eq!(payload["class"], json!("MultiInterventionDistributor"));
    let list = payload["Intervention_List"].as_array().expect("list");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["class"], json!("TyphoidVaccine"));
    assert_eq!(list[1]["class"], json!("BroadcastEvent"));
    assert_eq!(list[1]["Broadcast_Event"], json!("VaccineDistributed"));
}

#[test]
fn triggered_event_listens_on_its_signals() {
    let schema = Schema::builtin();
    let targeting = EventTargeting {
        coverage: 0.6,
        ..EventTargeting::default()
    };
    let event = triggered_campaign_event(
        &schema,
        10.0,
        &["Births".to_string(), "NewInfection".to_string()],
        &targeting,
        one_vaccine(&schema),
        None,
    )
    .expect("event");
    let value = event.to_value();
    let listener = &value["Event_Coordinator_Config"]["Intervention_Config"];
    assert_eq!(listener["class"], json!("NodeLevelHealthTriggeredIV"));
    assert_eq!(listener["Trigger_Condition_List"], json!(["Births", "NewInfection"]));
    assert_eq!(listener["Demographic_Coverage"], json!(0.6));
    assert_eq!(
        listener["Actual_IndividualIntervention_Config"]["class"],
        json!("TyphoidVaccine")
    );
}

#[test]
fn triggered_event_requires_triggers() {
    let schema = Schema::builtin();
    let err = triggered_campaign_event(
        &schema,
        1.0,
        &[],
        &EventTargeting::default(),
        one_vaccine(&schema),
        None,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "event-no-triggers");
}

#[test]
fn delayed_intervention_uses_a_uniform_window() {
    let schema = Schema::builtin();
    let ivs = one_vaccine(&schema);
    let delayed = delayed_intervention(&schema, 243.0, 257.0, &ivs).expect("delayed");
    let value = delayed.to_value();
    assert_eq!(value["Delay_Period_Distribution"], json!("UNIFORM_DISTRIBUTION"));
    assert_eq!(value["Delay_Period_Min"], json!(243.0));
    assert_eq!(value["Delay_Period_Max"], json!(257.0));
    let configs = value["Actual_IndividualIntervention_Configs"]
        .as_array()
        .expect("configs");
    assert_eq!(configs.len(), 1);
}

#[test]
fn delayed_intervention_rejects_inverted_window() {
    let schema = Schema::builtin();
    let ivs = one_vaccine(&schema);
    let err = delayed_intervention(&schema, 10.0, 5.0, &ivs).unwrap_err();
    assert_eq!(err.info().code, "delay-range");
}

fn routine_delay_window(event: &Value) -> (Value, Value) {
    let delayed = &event["Event_Coordinator_Config"]["Intervention_Config"]
        ["Actual_IndividualIntervention_Config"];
    assert_eq!(delayed["class"], json!("DelayedIntervention"));
    (
        delayed["Delay_Period_Min"].clone(),
        delayed["Delay_Period_Max"].clone(),
    )
}

#[test]
fn routine_immunization_delays_around_child_age() {
    let schema = Schema::builtin();
    let opts = RoutineImmunizationOpts {
        child_age: 250.0,
        ..RoutineImmunizationOpts::default()
    };
    let event = routine_immunization(&schema, &opts).expect("event");
    let value = event.to_value();
    let listener = &value["Event_Coordinator_Config"]["Intervention_Config"];
    assert_eq!(listener["Trigger_Condition_List"], json!(["Births"]));
    let (min, max) = routine_delay_window(&value);
    assert_eq!(min, json!(243.0));
    assert_eq!(max, json!(257.0));
}

#[test]
fn routine_immunization_clamps_newborn_delay_at_zero() {
    let schema = Schema::builtin();
    let opts = RoutineImmunizationOpts {
        child_age: 3.0,
        ..RoutineImmunizationOpts::default()
    };
    let event = routine_immunization(&schema, &opts).expect("event");
    let (min, max) = routine_delay_window(&event.to_value());
    assert_eq!(min, json!(0.0));
    assert_eq!(max, json!(10.0));
}

#[test]
fn routine_plus_catchup_yields_both_events() {
    let schema = Schema::builtin();
    let opts = RoutinePlusCatchupOpts {
        ria_coverage: 0.75,
        catchup_coverage: 0.5,
        ..RoutinePlusCatchupOpts::default()
    };
    let (ria, catchup) = routine_plus_catchup(&schema, &opts).expect("events");

    let ria = ria.to_value();
    let listener = &ria["Event_Coordinator_Config"]["Intervention_Config"];
    assert_eq!(listener["class"], json!("NodeLevelHealthTriggeredIV"));
    assert_eq!(listener["Demographic_Coverage"], json!(0.75));

    let catchup = catchup.to_value();
    let coordinator = &catchup["Event_Coordinator_Config"];
    assert_eq!(coordinator["Demographic_Coverage"], json!(0.5));
    assert_eq!(coordinator["Target_Demographic"], json!("ExplicitAgeRanges"));
    assert_eq!(coordinator["Target_Age_Min"], json!(0.75));
    assert_eq!(coordinator["Target_Age_Max"], json!(15.0));
}

#[test]
fn default_simple_vaccine_builds_through_both_composers() {
    let schema = Schema::builtin();
    let iv = simple_vaccine(&schema, &VaccineOpts::default()).expect("vaccine");
    scheduled_campaign_event(
        &schema,
        1.0,
        &EventTargeting::default(),
        &Repetition { count: -1, interval_days: 365.0 },
        vec![iv.clone()],
        None,
    )
    .expect("scheduled");
    triggered_campaign_event(
        &schema,
        1.0,
        &["Births".to_string()],
        &EventTargeting::default(),
        vec![iv],
        None,
    )
    .expect("triggered");
}
