use chrono::Utc;
use emod_core::canon::stable_hash_string;
use emod_core::errors::EmodError;
use serde::{Deserialize, Serialize};

use crate::grid::GridAxis;
use crate::variant::{Params, Tags};

/// Summary of one materialized run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: usize,
    pub dir: String,
    pub params: Params,
    pub tags: Tags,
}

/// Deterministic manifest tying a sweep's runs back to the plan that
/// produced them. The plan hash depends only on the axes, so re-running the
/// same plan reproduces the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBook {
    pub plan_hash: String,
    pub created_at: String,
    pub jobs: Vec<JobReport>,
}

/// Builds the runbook for a materialized sweep.
pub fn build_runbook(axes: &[GridAxis], jobs: Vec<JobReport>) -> Result<RunBook, EmodError> {
    let plan_hash = stable_hash_string(&axes)?;
    Ok(RunBook {
        plan_hash,
        created_at: Utc::now().to_rfc3339(),
        jobs,
    })
}
