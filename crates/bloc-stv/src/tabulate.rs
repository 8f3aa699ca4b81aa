use std::collections::BTreeMap;

use bloc_ballot::BallotProfile;
use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::CandidateId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quota::QuotaKind;
use crate::state::{tally_key, ElectionState, Status};

/// What happens when every ballot has exhausted but seats remain open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlockPolicy {
    /// Stop with [`VoteError::TabulationDeadlock`].
    #[default]
    Fail,
    /// Keep eliminating zero-tally candidates by the tie rule.
    EliminateByTieBreak,
}

/// Tabulation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StvOptions {
    /// Quota formula.
    #[serde(default)]
    pub quota: QuotaKind,
    /// Behaviour once all ballots exhaust early.
    #[serde(default)]
    pub deadlock: DeadlockPolicy,
    /// Whether to keep a per-round log.
    #[serde(default)]
    pub record_rounds: bool,
}

/// How a candidate won its seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElectedVia {
    /// Reached the quota.
    Quota,
    /// Elected because the remaining field equalled the open seats.
    Fill,
}

/// A seat winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectedCandidate {
    /// Winner.
    pub candidate: CandidateId,
    /// Round in which the seat was won.
    pub round: usize,
    /// Route to the seat.
    pub via: ElectedVia,
    /// Tally at the moment of election.
    pub tally: f64,
}

/// A candidate knocked out of the count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminatedCandidate {
    /// Loser.
    pub candidate: CandidateId,
    /// Round of elimination.
    pub round: usize,
    /// Tally at elimination.
    pub tally: f64,
}

/// Snapshot of one round.
///
/// `tallies` are taken before redistribution; the weight ledger
/// (`active_weight`, `exhausted_weight`, `retained_weight`) after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// One-based round number.
    pub round: usize,
    /// Weight held by every candidate still in the count.
    pub tallies: BTreeMap<CandidateId, f64>,
    /// Candidates elected this round, in election order.
    pub elected: Vec<CandidateId>,
    /// Candidate eliminated this round.
    pub eliminated: Option<CandidateId>,
    /// Weight still on live ballots.
    pub active_weight: f64,
    /// Weight lost on exhausted ballots.
    pub exhausted_weight: f64,
    /// Weight kept by elected candidates.
    pub retained_weight: f64,
}

/// Result of a completed tabulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StvOutcome {
    /// Seats filled.
    pub seats: usize,
    /// Threshold used in every round.
    pub quota: f64,
    /// Number of ballots counted.
    pub total_ballots: u64,
    /// Winners in election order.
    pub elected: Vec<ElectedCandidate>,
    /// Eliminated candidates in elimination order.
    pub eliminated: Vec<EliminatedCandidate>,
    /// Number of rounds run.
    pub round_count: usize,
    /// Round log, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<Vec<RoundRecord>>,
}

impl StvOutcome {
    /// Winners in election order.
    pub fn elected_ids(&self) -> Vec<CandidateId> {
        self.elected.iter().map(|e| e.candidate.clone()).collect()
    }
}

/// Single Transferable Vote counter.
///
/// Each round tallies live ballots at their current weight. Candidates at or
/// above quota are elected, most votes first, and their surplus moves on at
/// the fractional value `surplus / tally`. When nobody reaches quota the
/// lowest candidate is eliminated and its ballots move on at full value. Once
/// the remaining field equals the open seats, all of it is elected.
///
/// Tallies are compared at a resolution of 1e-9. Equal tallies favour the
/// smaller candidate identifier: it is elected first and survives an
/// elimination tie.
#[derive(Debug, Clone, Default)]
pub struct StvTabulator {
    options: StvOptions,
}

impl StvTabulator {
    /// Creates a tabulator with the given options.
    pub fn new(options: StvOptions) -> Self {
        Self { options }
    }

    /// Counts `profile` for `seats` seats among `candidates`.
    pub fn tabulate(
        &self,
        profile: &BallotProfile,
        candidates: &[CandidateId],
        seats: usize,
    ) -> Result<StvOutcome, VoteError> {
        if seats == 0 {
            return Err(VoteError::InsufficientCandidates(
                ErrorInfo::new("stv-seats-zero", "at least one seat must be filled")
                    .with_context("candidates", candidates.len().to_string()),
            ));
        }
        if seats > candidates.len() {
            return Err(VoteError::InsufficientCandidates(
                ErrorInfo::new("stv-seats-exceed-field", "more seats than candidates")
                    .with_context("seats", seats.to_string())
                    .with_context("candidates", candidates.len().to_string()),
            ));
        }

        let state = ElectionState::new(profile, candidates)?;
        let quota = self.options.quota.threshold(profile.total(), seats);
        let mut run = Run {
            state,
            options: &self.options,
            quota,
            seats,
            elected: Vec::with_capacity(seats),
            eliminated: Vec::new(),
            rounds: Vec::new(),
        };
        let round_count = run.execute(profile.total())?;

        let Run {
            elected,
            eliminated,
            rounds,
            ..
        } = run;
        Ok(StvOutcome {
            seats,
            quota,
            total_ballots: profile.total(),
            elected,
            eliminated,
            round_count,
            rounds: self.options.record_rounds.then_some(rounds),
        })
    }
}

/// Counts `profile` with the given options.
pub fn tabulate(
    profile: &BallotProfile,
    candidates: &[CandidateId],
    seats: usize,
    options: &StvOptions,
) -> Result<StvOutcome, VoteError> {
    StvTabulator::new(*options).tabulate(profile, candidates, seats)
}

struct Run<'a> {
    state: ElectionState,
    options: &'a StvOptions,
    quota: f64,
    seats: usize,
    elected: Vec<ElectedCandidate>,
    eliminated: Vec<EliminatedCandidate>,
    rounds: Vec<RoundRecord>,
}

impl Run<'_> {
    fn execute(&mut self, total_ballots: u64) -> Result<usize, VoteError> {
        let mut round = 0;
        while self.elected.len() < self.seats {
            round += 1;
            let open = self.seats - self.elected.len();
            let remaining = self.state.remaining();
            let tallies = self.state.tally();
            let snapshot = self.snapshot(&remaining, &tallies);

            if remaining.len() <= open {
                let winners = self.state.favoured_order(remaining, &tallies);
                let names = self.elect(&winners, &tallies, round, ElectedVia::Fill);
                self.record(round, snapshot, names, None);
                if self.elected.len() < self.seats {
                    return Err(self.deadlock(round, total_ballots));
                }
                break;
            }

            // Weight below the tally resolution counts as exhausted.
            if tally_key(self.state.active_weight()) <= 0
                && self.options.deadlock == DeadlockPolicy::Fail
            {
                return Err(self.deadlock(round, total_ballots));
            }

            let quota_key = tally_key(self.quota);
            let reached: Vec<usize> = remaining
                .iter()
                .copied()
                .filter(|&c| tally_key(tallies[c]) >= quota_key)
                .collect();
            if !reached.is_empty() {
                let mut winners = self.state.favoured_order(reached, &tallies);
                winners.truncate(open);
                let names = self.elect(&winners, &tallies, round, ElectedVia::Quota);
                self.record(round, snapshot, names, None);
                continue;
            }

            let order = self.state.favoured_order(remaining, &tallies);
            // non-empty: remaining.len() > open >= 1
            let Some(&loser) = order.last() else { break };
            self.state.mark(loser, Status::Eliminated);
            self.state.transfer(loser, 1.0);
            let name = self.state.candidate(loser).clone();
            debug!(round, candidate = %name, tally = tallies[loser], "eliminated");
            self.eliminated.push(EliminatedCandidate {
                candidate: name.clone(),
                round,
                tally: tallies[loser],
            });
            self.record(round, snapshot, Vec::new(), Some(name));
        }
        Ok(round)
    }

    fn elect(
        &mut self,
        winners: &[usize],
        tallies: &[f64],
        round: usize,
        via: ElectedVia,
    ) -> Vec<CandidateId> {
        for &winner in winners {
            self.state.mark(winner, Status::Elected);
        }
        let mut names = Vec::with_capacity(winners.len());
        for &winner in winners {
            let tally = tallies[winner];
            // A tally that matches the quota at tally resolution has no surplus.
            let factor = match via {
                ElectedVia::Quota if tally_key(tally) > tally_key(self.quota) => {
                    ((tally - self.quota) / tally).max(0.0)
                }
                _ => 0.0,
            };
            self.state.transfer(winner, factor);
            let name = self.state.candidate(winner).clone();
            debug!(round, candidate = %name, tally, ?via, "elected");
            self.elected.push(ElectedCandidate {
                candidate: name.clone(),
                round,
                via,
                tally,
            });
            names.push(name);
        }
        names
    }

    fn snapshot(&self, remaining: &[usize], tallies: &[f64]) -> BTreeMap<CandidateId, f64> {
        if !self.options.record_rounds {
            return BTreeMap::new();
        }
        remaining
            .iter()
            .map(|&c| (self.state.candidate(c).clone(), tallies[c]))
            .collect()
    }

    fn record(
        &mut self,
        round: usize,
        tallies: BTreeMap<CandidateId, f64>,
        elected: Vec<CandidateId>,
        eliminated: Option<CandidateId>,
    ) {
        if !self.options.record_rounds {
            return;
        }
        self.rounds.push(RoundRecord {
            round,
            tallies,
            elected,
            eliminated,
            active_weight: self.state.active_weight(),
            exhausted_weight: self.state.exhausted_weight(),
            retained_weight: self.state.retained_weight(),
        });
    }

    fn deadlock(&self, round: usize, total_ballots: u64) -> VoteError {
        VoteError::TabulationDeadlock(
            ErrorInfo::new(
                "stv-ballots-exhausted",
                "every ballot exhausted before all seats were filled",
            )
            .with_context("round", round.to_string())
            .with_context("elected", self.elected.len().to_string())
            .with_context("seats", self.seats.to_string())
            .with_context("remaining", self.state.remaining().len().to_string())
            .with_context("ballots", total_ballots.to_string())
            .with_context("candidates", self.state.candidate_count().to_string())
            .with_hint("use the eliminate-by-tie-break deadlock policy to continue"),
        )
    }
}
