use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use bloc_ballot::BallotProfile;
use bloc_core::CandidateId;
use bloc_exp::serde::from_json_slice;
use bloc_stv::{tabulate, DeadlockPolicy, QuotaKind, StvOptions, StvOutcome};
use clap::{Args, ValueEnum};

use super::print_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuotaArg {
    Droop,
    Hare,
}

impl From<QuotaArg> for QuotaKind {
    fn from(arg: QuotaArg) -> Self {
        match arg {
            QuotaArg::Droop => QuotaKind::Droop,
            QuotaArg::Hare => QuotaKind::Hare,
        }
    }
}

#[derive(Args, Debug)]
pub struct TabulateArgs {
    /// JSON profile: `[{"ranking": [...], "count": n}, ...]`.
    #[arg(long)]
    pub ballots: PathBuf,
    /// Seats to fill.
    #[arg(long)]
    pub seats: usize,
    /// Quota formula.
    #[arg(long, value_enum, default_value_t = QuotaArg::Droop)]
    pub quota: QuotaArg,
    /// Extra candidates standing without appearing on any ballot.
    #[arg(long, value_delimiter = ',')]
    pub candidates: Vec<String>,
    /// Keep eliminating by the tie rule when every ballot exhausts early.
    #[arg(long)]
    pub tie_break_deadlock: bool,
    /// Keep the per-round count log in the output.
    #[arg(long)]
    pub rounds: bool,
}

pub fn run(args: &TabulateArgs) -> Result<(), Box<dyn Error>> {
    let outcome = execute(args)?;
    print_json(&outcome)
}

fn execute(args: &TabulateArgs) -> Result<StvOutcome, Box<dyn Error>> {
    let bytes = fs::read(&args.ballots)?;
    let profile: BallotProfile = from_json_slice(&bytes)?;
    let mut field: BTreeSet<CandidateId> = profile.named_candidates();
    field.extend(args.candidates.iter().map(|label| CandidateId::new(label.as_str())));
    let candidates: Vec<CandidateId> = field.into_iter().collect();
    let options = StvOptions {
        quota: args.quota.into(),
        deadlock: if args.tie_break_deadlock {
            DeadlockPolicy::EliminateByTieBreak
        } else {
            DeadlockPolicy::Fail
        },
        record_rounds: args.rounds,
    };
    Ok(tabulate(&profile, &candidates, args.seats, &options)?)
}
