use emod_core::errors::{EmodError, ErrorInfo};
use emod_schema::{ConfigNode, Schema};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::waning::{waning_config, WaningParams};

const TYPHOID_MODES: [&str; 3] = ["Shedding", "Dose", "Exposures"];
const SIMPLE_MODES: [&str; 3] = ["Acquisition", "Transmission", "All"];

/// Parameters shared by the vaccine builders. `mode` defaults to
/// `"Shedding"` for the typhoid vaccine and `"Acquisition"` for the simple
/// vaccine when left unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineOpts {
    #[serde(default = "default_efficacy")]
    pub efficacy: f64,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub waning: WaningParams,
}

fn default_efficacy() -> f64 {
    0.82
}

impl Default for VaccineOpts {
    fn default() -> Self {
        Self {
            efficacy: default_efficacy(),
            mode: None,
            waning: WaningParams::default(),
        }
    }
}

fn check_mode<'a>(
    mode: Option<&'a str>,
    fallback: &'a str,
    valid: &[&str],
) -> Result<&'a str, EmodError> {
    let mode = mode.unwrap_or(fallback);
    if valid.contains(&mode) {
        Ok(mode)
    } else {
        Err(EmodError::Argument(
            ErrorInfo::new("vaccine-bad-mode", "vaccine mode not recognized")
                .with_context("mode", mode)
                .with_hint(format!("options are: {}", valid.join(", "))),
        ))
    }
}

/// Builds a `TyphoidVaccine` intervention: a route-targeted effect with a
/// waning `Changing_Effect` sub-config. The returned node is detached;
/// distribute it with [`crate::scheduled_campaign_event`] or
/// [`crate::triggered_campaign_event`].
pub fn typhoid_vaccine(schema: &Schema, opts: &VaccineOpts) -> Result<ConfigNode, EmodError> {
    let mode = check_mode(opts.mode.as_deref(), "Shedding", &TYPHOID_MODES)?;
    let mut iv = schema.class_with_defaults("TyphoidVaccine")?;
    iv.set("Effect", opts.efficacy)?;
    iv.set("Mode", mode)?;
    let waning = waning_config(schema, &opts.waning, opts.efficacy)?;
    iv.set_node("Changing_Effect", &waning)?;
    Ok(iv)
}

/// Builds a `SimpleVaccine` intervention (the original `new_vax`). The mode
/// maps onto the schema's `Vaccine_Type`: `Acquisition` →
/// `AcquisitionBlocking`, `Transmission` → `TransmissionBlocking`, `All` →
/// `General`.
pub fn simple_vaccine(schema: &Schema, opts: &VaccineOpts) -> Result<ConfigNode, EmodError> {
    let mode = check_mode(opts.mode.as_deref(), "Acquisition", &SIMPLE_MODES)?;
    let vaccine_type = match mode {
        "Acquisition" => "AcquisitionBlocking",
        "Transmission" => "TransmissionBlocking",
        _ => "General",
    };
    let mut iv = schema.class_with_defaults("SimpleVaccine")?;
    iv.set("Vaccine_Type", vaccine_type)?;
    let waning = waning_config(schema, &opts.waning, opts.efficacy)?;
    iv.set_node("Waning_Config", &waning)?;
    Ok(iv)
}

/// Case-seeding parameters for [`outbreak_seed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakOpts {
    #[serde(default)]
    pub antigen: i64,
    #[serde(default)]
    pub genome: i64,
    #[serde(default = "default_ignore_immunity")]
    pub ignore_immunity: i64,
}

fn default_ignore_immunity() -> i64 {
    1
}

impl Default for OutbreakOpts {
    fn default() -> Self {
        Self {
            antigen: 0,
            genome: 0,
            ignore_immunity: default_ignore_immunity(),
        }
    }
}

/// Builds an `OutbreakIndividual` case-seeding intervention. Coverage and
/// repetition live on the surrounding campaign event, not here.
pub fn outbreak_seed(schema: &Schema, opts: &OutbreakOpts) -> Result<ConfigNode, EmodError> {
    let mut iv = schema.class_with_defaults("OutbreakIndividual")?;
    iv.set("Antigen", opts.antigen)?;
    iv.set("Genome", opts.genome)?;
    iv.set("Ignore_Immunity", opts.ignore_immunity)?;
    Ok(iv)
}

/// Builds a `NodeInfectivityMult` intervention scaling environmental-route
/// infectivity over time. `times` (days) and `values` (multipliers) must be
/// the same length with strictly ascending times.
pub fn node_infectivity_multiplier(
    schema: &Schema,
    times: &[f64],
    values: &[f64],
) -> Result<ConfigNode, EmodError> {
    if times.len() != values.len() || times.is_empty() {
        return Err(EmodError::Argument(
            ErrorInfo::new(
                "infectivity-mult-shape",
                "times and values must be nonempty lists of equal length",
            )
            .with_context("times_len", times.len().to_string())
            .with_context("values_len", values.len().to_string()),
        ));
    }
    if times.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(EmodError::Argument(
            ErrorInfo::new("infectivity-mult-order", "times must be strictly ascending")
                .with_context("times", format!("{times:?}")),
        ));
    }
    let mut iv = schema.class_with_defaults("NodeInfectivityMult")?;
    iv.set(
        "Multiplier_By_Duration",
        json!({ "Times": times, "Values": values }),
    )?;
    iv.set("Transmission_Route", "ENVIRONMENTAL")?;
    Ok(iv)
}

/// Builds a `BroadcastEvent` companion intervention carrying a named signal
/// for downstream event reports.
pub fn broadcast_event(schema: &Schema, event_name: &str) -> Result<ConfigNode, EmodError> {
    if event_name.is_empty() {
        return Err(EmodError::Argument(ErrorInfo::new(
            "broadcast-empty",
            "broadcast event name must not be empty",
        )));
    }
    let mut iv = schema.class_with_defaults("BroadcastEvent")?;
    iv.set("Broadcast_Event", event_name)?;
    Ok(iv)
}
