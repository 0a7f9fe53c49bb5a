use std::fs;
use std::path::Path;

use emod_campaign::CampaignBuilder;
use emod_core::errors::{EmodError, ErrorInfo};
use emod_demog::Demographics;

use crate::grid::GridAxis;
use crate::runbook::{build_runbook, JobReport, RunBook};
use crate::task::SimTask;
use crate::variant::{sweep, Params, Tags};

/// The three artifacts every simulation run consumes: config parameters,
/// campaign, and demographics. Mutators receive a fresh set per variant.
pub struct RunArtifacts {
    pub task: SimTask,
    pub campaign: CampaignBuilder,
    pub demographics: Demographics,
}

/// Expands the sweep and writes one `job_NNNN/` directory per variant under
/// `out_dir`, each holding `config.json`, `campaign.json`,
/// `demographics.json`, and `tags.json`, plus a top-level `runbook.json`.
///
/// `base` plays the role of the driver's build callbacks: it assembles the
/// unswept artifacts for one run. The mutator applies one parameter
/// combination and reports its tags.
pub fn materialize<B, F>(
    axes: &[GridAxis],
    out_dir: impl AsRef<Path>,
    base: B,
    mutator: F,
) -> Result<RunBook, EmodError>
where
    B: Fn() -> Result<RunArtifacts, EmodError>,
    F: Fn(&mut RunArtifacts, &Params) -> Result<Tags, EmodError> + Send + Sync + 'static,
{
    let out_dir = out_dir.as_ref();
    let variants = sweep(axes, mutator);
    let mut jobs = Vec::with_capacity(variants.len());

    for (job_id, variant) in variants.iter().enumerate() {
        let dir = out_dir.join(format!("job_{:04}", job_id));
        fs::create_dir_all(&dir).map_err(|err| {
            EmodError::Sweep(
                ErrorInfo::new("sweep-create-dir", "failed to create run directory")
                    .with_context("path", dir.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;

        let mut artifacts = base()?;
        let tags = variant.apply(&mut artifacts)?;

        artifacts.task.save(dir.join("config.json"))?;
        artifacts.campaign.save(dir.join("campaign.json"))?;
        artifacts.demographics.save(dir.join("demographics.json"))?;
        write_json(&dir.join("tags.json"), &tags)?;

        jobs.push(JobReport {
            job_id,
            dir: dir.display().to_string(),
            params: variant.params().clone(),
            tags,
        });
    }

    let runbook = build_runbook(axes, jobs)?;
    write_json(&out_dir.join("runbook.json"), &runbook)?;
    log::info!(
        "materialized {} runs under {} (plan {})",
        runbook.jobs.len(),
        out_dir.display(),
        runbook.plan_hash
    );
    Ok(runbook)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), EmodError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| EmodError::Io(ErrorInfo::new("sweep-encode", err.to_string())))?;
    fs::write(path, rendered).map_err(|err| {
        EmodError::Io(
            ErrorInfo::new("sweep-write", "failed to write sweep artifact")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}
