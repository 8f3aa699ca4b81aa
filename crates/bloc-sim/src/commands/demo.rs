use std::error::Error;

use bloc_exp::demo::{DEMO_BALLOTS, DEMO_SEATS};
use bloc_exp::{demo_plan, run_election, CrossOver};
use clap::Args;
use tracing::info;

use super::print_json;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Seed for ballot generation.
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,
    /// Ballots cast.
    #[arg(long, default_value_t = DEMO_BALLOTS)]
    pub ballots: u64,
    /// Seats filled.
    #[arg(long, default_value_t = DEMO_SEATS)]
    pub seats: usize,
    /// Cross-over probability applied between every pair of neighbouring blocs.
    #[arg(long, default_value_t = 0.2)]
    pub crossover: f64,
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let plan = demo_plan(CrossOver::uniform(args.crossover), args.ballots, args.seats);
    let report = run_election(&plan, args.seed)?;
    for (slate, seats) in &report.outcome.stv_seats {
        let list = report
            .outcome
            .party_list_seats
            .get(slate)
            .copied()
            .unwrap_or(0);
        info!(slate = %slate, stv = seats, party_list = list, "seats by slate");
    }
    print_json(&report)
}
