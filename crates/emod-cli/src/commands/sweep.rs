use std::path::PathBuf;

use clap::Args;
use emod_campaign::{routine_plus_catchup, CampaignBuilder, RoutinePlusCatchupOpts};
use emod_core::errors::{EmodError, ErrorInfo};
use emod_schema::Schema;
use emod_sweep::{materialize, registry_append, RunArtifacts, SimTask, Tags};
use serde_json::Value;

use crate::scenario::{build_demographics, from_yaml_file, SweepPlanFile};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep plan (axes, campaign, demographics, fixed parameters).
    #[arg(long)]
    pub plan: PathBuf,
    /// Simulator schema JSON; the bundled typhoid schema is used when
    /// omitted.
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// Directory receiving one job_NNNN/ artifact set per variant.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional CSV run registry to append to.
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

fn as_f64(name: &str, value: &Value) -> Result<f64, EmodError> {
    value.as_f64().ok_or_else(|| {
        EmodError::Argument(
            ErrorInfo::new("sweep-param-type", "sweep parameter must be numeric")
                .with_context("parameter", name)
                .with_context("value", value.to_string()),
        )
    })
}

/// Applies one parameter combination: the vaccination-campaign parameters
/// rebuild the routine + catch-up events, anything else is a plain
/// `config.parameters` assignment. The tag map mirrors what was applied.
fn apply_combination(
    schema: &Schema,
    base: &RoutinePlusCatchupOpts,
    artifacts: &mut RunArtifacts,
    params: &emod_sweep::Params,
) -> Result<Tags, EmodError> {
    let mut opts = base.clone();
    let mut tags = Tags::new();
    for (name, value) in params {
        match name.as_str() {
            "efficacy" => opts.vaccine.efficacy = as_f64(name, value)?,
            "coverage" => {
                let v = as_f64(name, value)?;
                opts.ria_coverage = v;
                opts.catchup_coverage = v;
            }
            "coverage_ria" => opts.ria_coverage = as_f64(name, value)?,
            "coverage_camp" => opts.catchup_coverage = as_f64(name, value)?,
            "decay_constant" => opts.vaccine.waning.decay_constant = as_f64(name, value)?,
            "expected_expiration" => {
                opts.vaccine.waning.expected_expiration = as_f64(name, value)?;
            }
            "start_day_offset" => opts.start_day += as_f64(name, value)?,
            "child_age" => opts.child_age = as_f64(name, value)?,
            _ => {
                artifacts.task.set_parameter(name, value.clone())?;
            }
        }
        tags.insert(name.clone(), value.clone());
    }
    let (ria, catchup) = routine_plus_catchup(schema, &opts)?;
    artifacts.campaign.add(&ria)?;
    artifacts.campaign.add(&catchup)?;
    Ok(tags)
}

pub fn run(args: &SweepArgs) -> Result<(), EmodError> {
    let schema = match &args.schema {
        Some(path) => Schema::from_file(path)?,
        None => Schema::builtin(),
    };
    let plan: SweepPlanFile = from_yaml_file(&args.plan)?;
    let demographics = build_demographics(&plan.demographics)?;

    let base_schema = schema.clone();
    let base_parameters = plan.parameters.clone();
    let base_demog = demographics;
    let base = move || -> Result<RunArtifacts, EmodError> {
        let mut task = SimTask::new(&base_schema)?;
        for (name, value) in &base_parameters {
            task.set_parameter(name, value.clone())?;
        }
        Ok(RunArtifacts {
            task,
            campaign: CampaignBuilder::new(base_schema.clone()).with_name("sweep"),
            demographics: base_demog.clone(),
        })
    };

    let mutator_schema = schema.clone();
    let campaign_base = plan.campaign.clone();
    let runbook = materialize(&plan.axes, &args.out, base, move |artifacts, params| {
        apply_combination(&mutator_schema, &campaign_base, artifacts, params)
    })?;

    if let Some(registry) = &args.registry {
        registry_append(registry, &runbook)?;
    }
    Ok(())
}
