use std::path::PathBuf;

use clap::{Args, Subcommand};
use emod_core::errors::EmodError;
use emod_demog::Demographics;

#[derive(Subcommand, Debug)]
pub enum DemogCommand {
    /// Import nodes from a CSV of lat/lon/pop records.
    FromCsv(FromCsvArgs),
    /// Generate a synthetic urban/rural population.
    FromParams(FromParamsArgs),
}

#[derive(Args, Debug)]
pub struct FromCsvArgs {
    /// Input CSV with lat, lon, pop and optional node_id columns.
    #[arg(long)]
    pub input: PathBuf,
    /// Site identifier recorded as the document's IdReference.
    #[arg(long, default_value = "No_Site")]
    pub site: String,
    /// Nodes below this population are dropped with a logged notice.
    #[arg(long, default_value_t = 0)]
    pub min_node_pop: u64,
    /// Output demographics file.
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct FromParamsArgs {
    /// Total population across all nodes.
    #[arg(long)]
    pub tot_pop: u64,
    /// Number of nodes to generate.
    #[arg(long)]
    pub num_nodes: u32,
    /// Fraction of the population living in rural nodes.
    #[arg(long)]
    pub frac_rural: f64,
    #[arg(long, default_value = "from_params")]
    pub id_ref: String,
    /// Seed for the rural population draws.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Output demographics file.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(command: &DemogCommand) -> Result<(), EmodError> {
    match command {
        DemogCommand::FromCsv(args) => {
            let demog = Demographics::from_csv(&args.input, args.site.clone(), args.min_node_pop)?;
            demog.save(&args.out)
        }
        DemogCommand::FromParams(args) => {
            let demog = Demographics::from_params(
                args.tot_pop,
                args.num_nodes,
                args.frac_rural,
                args.id_ref.clone(),
                args.seed,
            )?;
            demog.save(&args.out)
        }
    }
}
