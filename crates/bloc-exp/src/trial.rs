use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bloc_ballot::{BlocAllocation, ElectionConfig, SlatePlackettLuce};
use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::{CandidateId, RngHandle, RunProvenance, SlateId};
use bloc_stv::{party_list_seats, StvOptions, StvOutcome, StvTabulator};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::hash::stable_hash_string;
use crate::plan::ElectionPlan;
use crate::serde::write_canonical_json;

/// Ballot count, seat count and counting rules shared by every trial of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSettings {
    /// Ballots generated per trial.
    pub ballots: u64,
    /// Seats filled per trial.
    pub seats: usize,
    /// Counting rules.
    #[serde(default)]
    pub stv: StvOptions,
    /// How ballots are split across blocs.
    #[serde(default)]
    pub allocation: BlocAllocation,
}

/// Everything one simulated election produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Seed the trial's generator started from.
    pub seed: u64,
    /// Full STV result.
    pub stv: StvOutcome,
    /// STV seats won by each slate (zero entries included).
    pub stv_seats: BTreeMap<SlateId, u64>,
    /// First preferences received by each slate's candidates.
    pub first_preferences: BTreeMap<SlateId, u64>,
    /// Largest-remainder party-list seats on those first preferences.
    pub party_list_seats: BTreeMap<SlateId, u64>,
}

/// Generates one ballot profile from `seed`, counts it, and derives the
/// per-slate summaries. Pure: equal inputs give equal outcomes.
pub fn run_trial(
    config: &ElectionConfig,
    settings: &TrialSettings,
    seed: u64,
) -> Result<TrialOutcome, VoteError> {
    let generator = SlatePlackettLuce::new(config).with_allocation(settings.allocation);
    let mut rng = RngHandle::from_seed(seed);
    let profile = generator.generate_profile(settings.ballots, &mut rng)?;
    let stv = StvTabulator::new(settings.stv).tabulate(
        &profile,
        generator.candidates(),
        settings.seats,
    )?;

    let mut stv_seats: BTreeMap<SlateId, u64> =
        config.slates().keys().map(|slate| (slate.clone(), 0)).collect();
    for winner in &stv.elected {
        let slate = slate_for(config, &winner.candidate)?;
        *stv_seats.entry(slate).or_insert(0) += 1;
    }

    let mut first_preferences: BTreeMap<SlateId, u64> =
        config.slates().keys().map(|slate| (slate.clone(), 0)).collect();
    for (candidate, votes) in profile.first_preferences() {
        let slate = slate_for(config, &candidate)?;
        *first_preferences.entry(slate).or_insert(0) += votes;
    }
    let party_list_seats = party_list_seats(&first_preferences, settings.seats as u64)?;

    Ok(TrialOutcome {
        seed: rng.seed(),
        stv,
        stv_seats,
        first_preferences,
        party_list_seats,
    })
}

fn slate_for(config: &ElectionConfig, candidate: &CandidateId) -> Result<SlateId, VoteError> {
    config.slate_of(candidate).cloned().ok_or_else(|| {
        VoteError::Config(
            ErrorInfo::new("trial-unknown-candidate", "candidate belongs to no slate")
                .with_context("candidate", candidate.as_str()),
        )
    })
}

/// File name of the report written by [`write_election_report`].
pub const ELECTION_REPORT_FILE: &str = "election_report.json";

/// Report for a single election run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionReport {
    /// Input hash, seed and schema.
    pub provenance: RunProvenance,
    /// Settings the trial ran with.
    pub settings: TrialSettings,
    /// Trial result.
    pub outcome: TrialOutcome,
}

/// Validates `plan` and runs one trial from `seed`.
pub fn run_election(plan: &ElectionPlan, seed: u64) -> Result<ElectionReport, VoteError> {
    let plan_hash = stable_hash_string(&(plan, seed))?;
    let config = plan.election.build()?;
    let settings = TrialSettings {
        ballots: plan.ballots,
        seats: plan.seats,
        stv: plan.stv,
        allocation: plan.election.allocation,
    };
    let outcome = run_trial(&config, &settings, seed)?;
    info!(
        seats = settings.seats,
        ballots = settings.ballots,
        rounds = outcome.stv.round_count,
        "election counted"
    );
    Ok(ElectionReport {
        provenance: RunProvenance::new(plan_hash, seed),
        settings,
        outcome,
    })
}

/// Writes the report as canonical JSON into `out`, creating the directory.
pub fn write_election_report(report: &ElectionReport, out: &Path) -> Result<PathBuf, VoteError> {
    write_canonical_json(report, out, ELECTION_REPORT_FILE)
}
