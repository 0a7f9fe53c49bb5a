use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

mod commands;
mod scenario;

use commands::{bump_version, campaign, demog, sweep, version};

#[derive(Parser, Debug)]
#[command(name = "emodctl", about = "EMOD configuration toolkit CLI")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a campaign file from a YAML scenario.
    Campaign(campaign::CampaignArgs),
    /// Build a demographics file.
    #[command(subcommand)]
    Demog(demog::DemogCommand),
    /// Expand a sweep plan into per-run artifact directories.
    Sweep(sweep::SweepArgs),
    /// Print the toolkit version.
    Version(version::VersionArgs),
    /// Bump the version in a Cargo manifest.
    BumpVersion(bump_version::BumpVersionArgs),
}

fn init_logging(verbose: bool) {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level));
    if let Ok(config) = config {
        let _ = log4rs::init_config(config);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Campaign(args) => campaign::run(args),
        Command::Demog(command) => demog::run(command),
        Command::Sweep(args) => sweep::run(args),
        Command::Version(args) => version::run(args),
        Command::BumpVersion(args) => bump_version::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
