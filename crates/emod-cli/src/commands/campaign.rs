use std::path::PathBuf;

use clap::Args;
use emod_core::errors::EmodError;
use emod_schema::Schema;

use crate::scenario::{build_campaign, from_yaml_file, Scenario};

#[derive(Args, Debug)]
pub struct CampaignArgs {
    /// YAML scenario describing the campaign events.
    #[arg(long)]
    pub scenario: PathBuf,
    /// Simulator schema JSON; the bundled typhoid schema is used when
    /// omitted.
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// Output campaign file.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &CampaignArgs) -> Result<(), EmodError> {
    let schema = match &args.schema {
        Some(path) => Schema::from_file(path)?,
        None => Schema::builtin(),
    };
    let scenario: Scenario = from_yaml_file(&args.scenario)?;
    let campaign = build_campaign(&schema, &scenario)?;
    campaign.save(&args.out)
}
