use emod_core::errors::{EmodError, ErrorInfo};
use emod_schema::{ConfigNode, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::interventions::{broadcast_event, simple_vaccine, VaccineOpts};

/// Demographic targeting shared by both event composers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTargeting {
    /// Fraction of the eligible population targeted, in `[0, 1]`.
    #[serde(default = "default_coverage")]
    pub coverage: f64,
    /// Restrict to these node ids; `None` targets every node.
    #[serde(default)]
    pub node_ids: Option<Vec<u32>>,
    /// Individual-property restrictions, e.g. `"Region:A"`. AND/OR semantics
    /// are decided by the simulator's schema, not here.
    #[serde(default)]
    pub property_restrictions: Vec<String>,
    /// Minimum targeted age in years.
    #[serde(default)]
    pub target_age_min: Option<f64>,
    /// Maximum targeted age in years.
    #[serde(default)]
    pub target_age_max: Option<f64>,
}

fn default_coverage() -> f64 {
    1.0
}

impl Default for EventTargeting {
    fn default() -> Self {
        Self {
            coverage: default_coverage(),
            node_ids: None,
            property_restrictions: Vec::new(),
            target_age_min: None,
            target_age_max: None,
        }
    }
}

impl EventTargeting {
    fn validate(&self) -> Result<(), EmodError> {
        if !(0.0..=1.0).contains(&self.coverage) {
            return Err(EmodError::Argument(
                ErrorInfo::new("targeting-coverage", "coverage must be within [0, 1]")
                    .with_context("coverage", self.coverage.to_string()),
            ));
        }
        if let (Some(min), Some(max)) = (self.target_age_min, self.target_age_max) {
            if min > max {
                return Err(EmodError::Argument(
                    ErrorInfo::new("targeting-age-range", "target_age_min exceeds target_age_max")
                        .with_context("target_age_min", min.to_string())
                        .with_context("target_age_max", max.to_string())
                        .with_hint("swapped bounds are the usual cause"),
                ));
            }
        }
        Ok(())
    }
}

/// Repetition settings for scheduled events. A count of -1 repeats until the
/// simulation ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Repetition {
    #[serde(default = "default_repetition_count")]
    pub count: i64,
    #[serde(default = "default_repetition_interval")]
    pub interval_days: f64,
}

fn default_repetition_count() -> i64 {
    1
}

fn default_repetition_interval() -> f64 {
    365.0
}

impl Default for Repetition {
    fn default() -> Self {
        Self {
            count: default_repetition_count(),
            interval_days: default_repetition_interval(),
        }
    }
}

fn nodeset(schema: &Schema, node_ids: Option<&[u32]>) -> Result<ConfigNode, EmodError> {
    match node_ids {
        Some(ids) if !ids.is_empty() => {
            let mut nodeset = schema.class_with_defaults("NodeSetNodeList")?;
            nodeset.set("Node_List", json!(ids))?;
            Ok(nodeset)
        }
        _ => schema.class_with_defaults("NodeSetAll"),
    }
}

/// One intervention is attached directly; several are wrapped in a
/// `MultiInterventionDistributor`.
fn intervention_payload(
    schema: &Schema,
    interventions: &[ConfigNode],
) -> Result<Value, EmodError> {
    match interventions {
        [] => Err(EmodError::Campaign(ErrorInfo::new(
            "event-no-interventions",
            "campaign event needs at least one intervention",
        ))),
        [only] => Ok(only.to_value()),
        many => {
            let mut multi = schema.class_with_defaults("MultiInterventionDistributor")?;
            let list: Vec<Value> = many.iter().map(ConfigNode::to_value).collect();
            multi.set("Intervention_List", Value::Array(list))?;
            Ok(multi.to_value())
        }
    }
}

fn append_co_event(
    schema: &Schema,
    interventions: &mut Vec<ConfigNode>,
    co_event: Option<&str>,
) -> Result<(), EmodError> {
    if let Some(name) = co_event {
        if !name.is_empty() {
            interventions.push(broadcast_event(schema, name)?);
        }
    }
    Ok(())
}

fn campaign_event(
    schema: &Schema,
    event_name: &str,
    start_day: f64,
    node_ids: Option<&[u32]>,
    coordinator: &ConfigNode,
) -> Result<ConfigNode, EmodError> {
    let mut event = schema.class_with_defaults("CampaignEvent")?;
    event.set("Event_Name", event_name)?;
    event.set("Start_Day", start_day)?;
    event.set_node("Nodeset_Config", &nodeset(schema, node_ids)?)?;
    event.set_node("Event_Coordinator_Config", coordinator)?;
    Ok(event)
}

/// Composes a campaign event that fires unconditionally at `start_day`,
/// optionally repeating. An optional co-event name appends a
/// `BroadcastEvent` to the intervention list.
pub fn scheduled_campaign_event(
    schema: &Schema,
    start_day: f64,
    targeting: &EventTargeting,
    repetition: &Repetition,
    mut interventions: Vec<ConfigNode>,
    co_event: Option<&str>,
) -> Result<ConfigNode, EmodError> {
    targeting.validate()?;
    append_co_event(schema, &mut interventions, co_event)?;
    let payload = intervention_payload(schema, &interventions)?;

    let mut coordinator =
        schema.class_with_defaults("StandardInterventionDistributionEventCoordinator")?;
    coordinator.set("Demographic_Coverage", targeting.coverage)?;
    coordinator.set("Property_Restrictions", json!(targeting.property_restrictions))?;
    if targeting.target_age_min.is_some() || targeting.target_age_max.is_some() {
        coordinator.set("Target_Demographic", "ExplicitAgeRanges")?;
        if let Some(min) = targeting.target_age_min {
            coordinator.set("Target_Age_Min", min)?;
        }
        if let Some(max) = targeting.target_age_max {
            coordinator.set("Target_Age_Max", max)?;
        }
    }
    coordinator.set("Number_Repetitions", repetition.count)?;
    coordinator.set("Timesteps_Between_Repetitions", repetition.interval_days)?;
    coordinator.set("Intervention_Config", payload)?;

    campaign_event(
        schema,
        "Scheduled_Campaign_Event",
        start_day,
        targeting.node_ids.as_deref(),
        &coordinator,
    )
}

/// Composes a campaign event that fires when one of the named signals is
/// broadcast. Coverage and property restrictions apply at the listening
/// node-level intervention, matching the simulator's triggered-event shape.
pub fn triggered_campaign_event(
    schema: &Schema,
    start_day: f64,
    triggers: &[String],
    targeting: &EventTargeting,
    mut interventions: Vec<ConfigNode>,
    co_event: Option<&str>,
) -> Result<ConfigNode, EmodError> {
    targeting.validate()?;
    if triggers.is_empty() {
        return Err(EmodError::Argument(ErrorInfo::new(
            "event-no-triggers",
            "triggered event needs at least one trigger signal",
        )));
    }
    append_co_event(schema, &mut interventions, co_event)?;
    let payload = intervention_payload(schema, &interventions)?;

    let mut listener = schema.class_with_defaults("NodeLevelHealthTriggeredIV")?;
    listener.set("Trigger_Condition_List", json!(triggers))?;
    listener.set("Demographic_Coverage", targeting.coverage)?;
    listener.set("Property_Restrictions", json!(targeting.property_restrictions))?;
    listener.set("Actual_IndividualIntervention_Config", payload)?;

    let mut coordinator =
        schema.class_with_defaults("StandardInterventionDistributionEventCoordinator")?;
    coordinator.set("Intervention_Config", listener.to_value())?;

    campaign_event(
        schema,
        "Triggered_Campaign_Event",
        start_day,
        targeting.node_ids.as_deref(),
        &coordinator,
    )
}

/// Wraps interventions in a `DelayedIntervention` with a uniform random
/// delay in `[delay_min, delay_max]` days.
pub fn delayed_intervention(
    schema: &Schema,
    delay_min: f64,
    delay_max: f64,
    interventions: &[ConfigNode],
) -> Result<ConfigNode, EmodError> {
    if delay_min > delay_max {
        return Err(EmodError::Argument(
            ErrorInfo::new("delay-range", "delay_min exceeds delay_max")
                .with_context("delay_min", delay_min.to_string())
                .with_context("delay_max", delay_max.to_string()),
        ));
    }
    let configs: Vec<Value> = interventions.iter().map(ConfigNode::to_value).collect();
    let mut delay = schema.class_with_defaults("DelayedIntervention")?;
    delay.set("Delay_Period_Distribution", "UNIFORM_DISTRIBUTION")?;
    delay.set("Delay_Period_Min", delay_min)?;
    delay.set("Delay_Period_Max", delay_max)?;
    delay.set("Actual_IndividualIntervention_Configs", Value::Array(configs))?;
    Ok(delay)
}

/// Options for [`routine_immunization`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineImmunizationOpts {
    #[serde(default)]
    pub vaccine: VaccineOpts,
    #[serde(default = "default_start_day")]
    pub start_day: f64,
    /// Age in days at which the child is vaccinated; distribution happens
    /// +/- 7 days around it.
    #[serde(default = "default_child_age")]
    pub child_age: f64,
    #[serde(default)]
    pub targeting: EventTargeting,
    /// Signal broadcast alongside the vaccine for event reports. `None`
    /// disables the broadcast.
    #[serde(default = "default_co_event")]
    pub co_event: Option<String>,
}

fn default_start_day() -> f64 {
    1.0
}

fn default_child_age() -> f64 {
    9.0 * 30.0
}

fn default_co_event() -> Option<String> {
    Some("VaccineDistributed".to_string())
}

impl Default for RoutineImmunizationOpts {
    fn default() -> Self {
        Self {
            vaccine: VaccineOpts::default(),
            start_day: default_start_day(),
            child_age: default_child_age(),
            targeting: EventTargeting::default(),
            co_event: default_co_event(),
        }
    }
}

/// Builds the birth-triggered, age-delayed vaccination event: a
/// `SimpleVaccine` (plus optional broadcast) inside a `DelayedIntervention`
/// with a uniform delay of `child_age +/- 7` days (clamped at 0), triggered
/// by `Births`.
pub fn routine_immunization(
    schema: &Schema,
    opts: &RoutineImmunizationOpts,
) -> Result<ConfigNode, EmodError> {
    let mut ivs = vec![simple_vaccine(schema, &opts.vaccine)?];
    append_co_event(schema, &mut ivs, opts.co_event.as_deref())?;
    let delay_min = (opts.child_age - 7.0).max(0.0);
    let delay_max = opts.child_age + 7.0;
    let delayed = delayed_intervention(schema, delay_min, delay_max, &ivs)?;
    triggered_campaign_event(
        schema,
        opts.start_day,
        &["Births".to_string()],
        &opts.targeting,
        vec![delayed],
        None,
    )
}

/// Options for [`routine_plus_catchup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutinePlusCatchupOpts {
    #[serde(default)]
    pub vaccine: VaccineOpts,
    #[serde(default = "default_start_day")]
    pub start_day: f64,
    #[serde(default = "default_child_age")]
    pub child_age: f64,
    #[serde(default = "default_coverage")]
    pub ria_coverage: f64,
    #[serde(default = "default_coverage")]
    pub catchup_coverage: f64,
    /// Catch-up age band in years.
    #[serde(default = "default_catchup_age_min")]
    pub catchup_age_min: f64,
    #[serde(default = "default_catchup_age_max")]
    pub catchup_age_max: f64,
    #[serde(default = "default_co_event")]
    pub co_event: Option<String>,
}

fn default_catchup_age_min() -> f64 {
    0.75
}

fn default_catchup_age_max() -> f64 {
    15.0
}

impl Default for RoutinePlusCatchupOpts {
    fn default() -> Self {
        Self {
            vaccine: VaccineOpts::default(),
            start_day: default_start_day(),
            child_age: default_child_age(),
            ria_coverage: default_coverage(),
            catchup_coverage: default_coverage(),
            catchup_age_min: default_catchup_age_min(),
            catchup_age_max: default_catchup_age_max(),
            co_event: default_co_event(),
        }
    }
}

/// The common "routine immunization at infancy plus a one-time catch-up
/// campaign for an age band" pattern. Pure composition: returns the routine
/// event and the catch-up event, in that order.
pub fn routine_plus_catchup(
    schema: &Schema,
    opts: &RoutinePlusCatchupOpts,
) -> Result<(ConfigNode, ConfigNode), EmodError> {
    let ria = routine_immunization(
        schema,
        &RoutineImmunizationOpts {
            vaccine: opts.vaccine.clone(),
            start_day: opts.start_day,
            child_age: opts.child_age,
            targeting: EventTargeting {
                coverage: opts.ria_coverage,
                ..EventTargeting::default()
            },
            co_event: opts.co_event.clone(),
        },
    )?;

    let catchup_ivs = vec![simple_vaccine(schema, &opts.vaccine)?];
    let catchup = scheduled_campaign_event(
        schema,
        opts.start_day,
        &EventTargeting {
            coverage: opts.catchup_coverage,
            target_age_min: Some(opts.catchup_age_min),
            target_age_max: Some(opts.catchup_age_max),
            ..EventTargeting::default()
        },
        &Repetition::default(),
        catchup_ivs,
        opts.co_event.as_deref(),
    )?;
    Ok((ria, catchup))
}
