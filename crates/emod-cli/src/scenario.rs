//! YAML-facing scenario and plan descriptions.
//!
//! These mirror the builder option structs one-to-one so a scenario file can
//! state only what it overrides; everything else falls back to the builder
//! defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use emod_campaign::{
    routine_immunization, routine_plus_catchup, scheduled_campaign_event, simple_vaccine,
    triggered_campaign_event, typhoid_vaccine, CampaignBuilder, EventTargeting, OutbreakOpts,
    Repetition, RoutineImmunizationOpts, RoutinePlusCatchupOpts, VaccineOpts,
};
use emod_campaign::outbreak_seed;
use emod_core::errors::{EmodError, ErrorInfo};
use emod_demog::{Demographics, HintProperty};
use emod_schema::{ConfigNode, Schema};
use emod_sweep::GridAxis;
use serde::Deserialize;
use serde_json::Value;

/// A campaign scenario: a named, ordered list of event specifications.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_campaign_name")]
    pub campaign_name: String,
    pub events: Vec<EventSpec>,
}

fn default_campaign_name() -> String {
    "Campaign".to_string()
}

/// Which vaccine class a scenario event distributes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VaccineKind {
    #[default]
    Typhoid,
    Simple,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledVaccineSpec {
    #[serde(default)]
    pub kind: VaccineKind,
    #[serde(default = "default_start_day")]
    pub start_day: f64,
    #[serde(default)]
    pub vaccine: VaccineOpts,
    #[serde(default)]
    pub targeting: EventTargeting,
    #[serde(default)]
    pub repetition: Repetition,
    #[serde(default)]
    pub co_event: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TriggeredVaccineSpec {
    #[serde(default)]
    pub kind: VaccineKind,
    #[serde(default = "default_start_day")]
    pub start_day: f64,
    #[serde(default = "default_triggers")]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub vaccine: VaccineOpts,
    #[serde(default)]
    pub targeting: EventTargeting,
    #[serde(default)]
    pub co_event: Option<String>,
}

fn default_start_day() -> f64 {
    1.0
}

fn default_triggers() -> Vec<String> {
    vec!["Births".to_string()]
}

#[derive(Debug, Deserialize)]
pub struct OutbreakSpec {
    #[serde(default = "default_start_day")]
    pub start_day: f64,
    #[serde(default)]
    pub outbreak: OutbreakOpts,
    #[serde(default)]
    pub targeting: EventTargeting,
    #[serde(default)]
    pub repetition: Repetition,
}

/// One campaign event in a scenario file, tagged by `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EventSpec {
    RoutineImmunization(RoutineImmunizationOpts),
    RoutinePlusCatchup(RoutinePlusCatchupOpts),
    ScheduledVaccine(ScheduledVaccineSpec),
    TriggeredVaccine(TriggeredVaccineSpec),
    Outbreak(OutbreakSpec),
}

fn build_vaccine(
    schema: &Schema,
    kind: VaccineKind,
    opts: &VaccineOpts,
) -> Result<ConfigNode, EmodError> {
    match kind {
        VaccineKind::Typhoid => typhoid_vaccine(schema, opts),
        VaccineKind::Simple => simple_vaccine(schema, opts),
    }
}

/// Assembles a campaign from a scenario description.
pub fn build_campaign(schema: &Schema, scenario: &Scenario) -> Result<CampaignBuilder, EmodError> {
    let mut campaign = CampaignBuilder::new(schema.clone()).with_name(&scenario.campaign_name);
    for event in &scenario.events {
        match event {
            EventSpec::RoutineImmunization(opts) => {
                campaign.add(&routine_immunization(schema, opts)?)?;
            }
            EventSpec::RoutinePlusCatchup(opts) => {
                let (ria, catchup) = routine_plus_catchup(schema, opts)?;
                campaign.add(&ria)?;
                campaign.add(&catchup)?;
            }
            EventSpec::ScheduledVaccine(spec) => {
                let iv = build_vaccine(schema, spec.kind, &spec.vaccine)?;
                campaign.add(&scheduled_campaign_event(
                    schema,
                    spec.start_day,
                    &spec.targeting,
                    &spec.repetition,
                    vec![iv],
                    spec.co_event.as_deref(),
                )?)?;
            }
            EventSpec::TriggeredVaccine(spec) => {
                let iv = build_vaccine(schema, spec.kind, &spec.vaccine)?;
                campaign.add(&triggered_campaign_event(
                    schema,
                    spec.start_day,
                    &spec.triggers,
                    &spec.targeting,
                    vec![iv],
                    spec.co_event.as_deref(),
                )?)?;
            }
            EventSpec::Outbreak(spec) => {
                let iv = outbreak_seed(schema, &spec.outbreak)?;
                campaign.add(&scheduled_campaign_event(
                    schema,
                    spec.start_day,
                    &spec.targeting,
                    &spec.repetition,
                    vec![iv],
                    None,
                )?)?;
            }
        }
    }
    Ok(campaign)
}

/// Demographics source selection for scenario and plan files.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DemogSource {
    TemplateNode {
        #[serde(default)]
        lat: f64,
        #[serde(default)]
        lon: f64,
        #[serde(default = "default_pop")]
        pop: u64,
        #[serde(default = "default_node_name")]
        name: String,
        #[serde(default = "default_forced_id")]
        forced_id: u32,
    },
    FromParams {
        tot_pop: u64,
        num_nodes: u32,
        frac_rural: f64,
        #[serde(default = "default_id_ref")]
        id_ref: String,
        #[serde(default)]
        seed: u64,
    },
    FromCsv {
        input: PathBuf,
        #[serde(default = "default_site")]
        site: String,
        #[serde(default)]
        min_node_pop: u64,
    },
}

fn default_pop() -> u64 {
    1_000_000
}

fn default_node_name() -> String {
    "1".to_string()
}

fn default_forced_id() -> u32 {
    1
}

fn default_id_ref() -> String {
    "from_params".to_string()
}

fn default_site() -> String {
    "No_Site".to_string()
}

impl Default for DemogSource {
    fn default() -> Self {
        DemogSource::TemplateNode {
            lat: 0.0,
            lon: 0.0,
            pop: default_pop(),
            name: default_node_name(),
            forced_id: default_forced_id(),
        }
    }
}

/// Demographics section of a plan: a source plus an optional HINT property.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemogSection {
    #[serde(flatten)]
    pub source: DemogSource,
    #[serde(default)]
    pub hint: Option<HintProperty>,
}

/// Builds the demographics document described by a plan section.
pub fn build_demographics(section: &DemogSection) -> Result<Demographics, EmodError> {
    let mut demog = match &section.source {
        DemogSource::TemplateNode {
            lat,
            lon,
            pop,
            name,
            forced_id,
        } => Demographics::from_template_node(*lat, *lon, *pop, name.clone(), *forced_id),
        DemogSource::FromParams {
            tot_pop,
            num_nodes,
            frac_rural,
            id_ref,
            seed,
        } => Demographics::from_params(*tot_pop, *num_nodes, *frac_rural, id_ref.clone(), *seed)?,
        DemogSource::FromCsv {
            input,
            site,
            min_node_pop,
        } => Demographics::from_csv(input, site.clone(), *min_node_pop)?,
    };
    if let Some(hint) = &section.hint {
        demog.add_individual_property_and_hint(hint)?;
    }
    Ok(demog)
}

/// A sweep plan: parameter axes, the vaccination campaign they modulate,
/// demographics, and fixed config-parameter overrides applied to every run.
#[derive(Debug, Deserialize)]
pub struct SweepPlanFile {
    pub axes: Vec<GridAxis>,
    #[serde(default)]
    pub campaign: RoutinePlusCatchupOpts,
    #[serde(default)]
    pub demographics: DemogSection,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

/// Parses a YAML document into `T`, wrapping parse failures with the file
/// path for diagnostics.
pub fn from_yaml_file<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T, EmodError> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        EmodError::Io(
            ErrorInfo::new("yaml-read", "failed to read input file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    serde_yaml::from_str(&raw).map_err(|err| {
        EmodError::Io(
            ErrorInfo::new("yaml-parse", "failed to parse YAML input")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scenario_defaults_fill_unstated_fields() {
        let scenario: Scenario = serde_yaml::from_str(
            "events:\n  - type: routine-immunization\n    child_age: 250\n",
        )
        .expect("parse");
        assert_eq!(scenario.campaign_name, "Campaign");
        assert_eq!(scenario.events.len(), 1);
        match &scenario.events[0] {
            EventSpec::RoutineImmunization(opts) => {
                assert_eq!(opts.child_age, 250.0);
                assert_eq!(opts.vaccine.efficacy, 0.82);
                assert_eq!(opts.co_event.as_deref(), Some("VaccineDistributed"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn scenario_builds_a_campaign_per_event() {
        let yaml = concat!(
            "campaign_name: seattle\n",
            "events:\n",
            "  - type: routine-plus-catchup\n",
            "    ria_coverage: 0.75\n",
            "  - type: outbreak\n",
            "    start_day: 30\n",
            "    targeting:\n",
            "      coverage: 0.01\n",
        );
        let scenario: Scenario = serde_yaml::from_str(yaml).expect("parse");
        let schema = Schema::builtin();
        let campaign = build_campaign(&schema, &scenario).expect("build");
        // routine-plus-catchup contributes two events, the outbreak one
        assert_eq!(campaign.events().len(), 3);
        let doc = campaign.to_document();
        assert_eq!(doc["Campaign_Name"], json!("seattle"));
    }

    #[test]
    fn triggered_vaccine_defaults_to_births() {
        let scenario: Scenario =
            serde_yaml::from_str("events:\n  - type: triggered-vaccine\n").expect("parse");
        match &scenario.events[0] {
            EventSpec::TriggeredVaccine(spec) => {
                assert_eq!(spec.triggers, vec!["Births".to_string()]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn demographics_section_defaults_to_a_template_node() {
        let section = DemogSection::default();
        let demog = build_demographics(&section).expect("build");
        assert_eq!(demog.nodes().len(), 1);
        assert_eq!(demog.nodes()[0].pop, 1_000_000);
    }

    #[test]
    fn from_params_source_parses_and_builds() {
        let section: DemogSection = serde_yaml::from_str(
            "type: from-params\ntot_pop: 10000\nnum_nodes: 4\nfrac_rural: 0.5\n",
        )
        .expect("parse");
        let demog = build_demographics(&section).expect("build");
        assert_eq!(demog.nodes().len(), 4);
        assert_eq!(demog.idref(), "from_params");
    }

    #[test]
    fn sweep_plan_parses_axes_and_fixed_parameters() {
        let yaml = concat!(
            "axes:\n",
            "  - name: coverage\n",
            "    values: [0.5, 0.8]\n",
            "  - name: decay_constant\n",
            "    values: [1234]\n",
            "parameters:\n",
            "  Simulation_Duration: 3650\n",
        );
        let plan: SweepPlanFile = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(plan.axes.len(), 2);
        assert_eq!(plan.axes[0].name, "coverage");
        assert_eq!(plan.axes[0].values, vec![json!(0.5), json!(0.8)]);
        assert_eq!(plan.parameters["Simulation_Duration"], json!(3650));
        assert_eq!(plan.campaign.catchup_age_max, 15.0);
    }
}
