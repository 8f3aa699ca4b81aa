use std::error::Error;
use std::path::PathBuf;

use bloc_exp::{load_election_plan, run_election, write_election_report, ElectionReport};
use clap::Args;
use tracing::info;

use super::print_json;

#[derive(Args, Debug)]
pub struct ElectArgs {
    /// YAML election file.
    #[arg(long)]
    pub config: PathBuf,
    /// Seed for ballot generation.
    #[arg(long)]
    pub seed: u64,
    /// Directory for `election_report.json`; prints to stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Keep the per-round count log in the report.
    #[arg(long)]
    pub rounds: bool,
}

pub fn run(args: &ElectArgs) -> Result<(), Box<dyn Error>> {
    let report = execute(args)?;
    let elected: Vec<String> = report
        .outcome
        .stv
        .elected
        .iter()
        .map(|winner| winner.candidate.to_string())
        .collect();
    info!(elected = ?elected, "seats filled");
    match &args.out {
        Some(out) => {
            let path = write_election_report(&report, out)?;
            info!(path = %path.display(), "wrote election report");
        }
        None => print_json(&report)?,
    }
    Ok(())
}

fn execute(args: &ElectArgs) -> Result<ElectionReport, Box<dyn Error>> {
    let mut plan = load_election_plan(&args.config)?;
    if args.rounds {
        plan.stv.record_rounds = true;
    }
    Ok(run_election(&plan, args.seed)?)
}
