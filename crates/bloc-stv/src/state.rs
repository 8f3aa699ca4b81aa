//! Flat, index-based state for one tabulation run.
//!
//! Candidates and distinct ballots receive stable integer indices at setup.
//! Every per-round mutation (candidate status, ballot weight, ballot cursor)
//! happens on vectors addressed by those indices.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use bloc_ballot::BallotProfile;
use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::CandidateId;

/// Resolution at which tallies are compared.
const TALLY_RESOLUTION: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Remaining,
    Elected,
    Eliminated,
}

#[derive(Debug, Clone)]
pub(crate) struct ElectionState {
    candidates: Vec<CandidateId>,
    status: Vec<Status>,
    rankings: Vec<Vec<usize>>,
    multiplicity: Vec<f64>,
    weight: Vec<f64>,
    cursor: Vec<usize>,
    exhausted: f64,
    retained: f64,
}

impl ElectionState {
    pub(crate) fn new(profile: &BallotProfile, candidates: &[CandidateId]) -> Result<Self, VoteError> {
        let mut index = BTreeMap::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            if index.insert(candidate, idx).is_some() {
                return Err(VoteError::Config(
                    ErrorInfo::new("stv-duplicate-candidate", "candidate listed twice")
                        .with_context("candidate", candidate.as_str()),
                ));
            }
        }

        let mut rankings = Vec::with_capacity(profile.distinct());
        let mut multiplicity = Vec::with_capacity(profile.distinct());
        for (ballot, count) in profile.iter() {
            let ranking = ballot
                .ranking()
                .iter()
                .map(|candidate| {
                    index.get(candidate).copied().ok_or_else(|| {
                        VoteError::Config(
                            ErrorInfo::new("stv-unknown-candidate", "ballot ranks a candidate outside the field")
                                .with_context("candidate", candidate.as_str()),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rankings.push(ranking);
            multiplicity.push(count as f64);
        }

        let ballots = rankings.len();
        let mut state = Self {
            candidates: candidates.to_vec(),
            status: vec![Status::Remaining; candidates.len()],
            rankings,
            multiplicity,
            weight: vec![1.0; ballots],
            cursor: vec![0; ballots],
            exhausted: 0.0,
            retained: 0.0,
        };
        for ballot in 0..ballots {
            if state.rankings[ballot].is_empty() {
                state.exhausted += state.multiplicity[ballot];
            }
        }
        Ok(state)
    }

    pub(crate) fn candidate(&self, idx: usize) -> &CandidateId {
        &self.candidates[idx]
    }

    pub(crate) fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub(crate) fn remaining(&self) -> Vec<usize> {
        (0..self.candidates.len())
            .filter(|&c| self.status[c] == Status::Remaining)
            .collect()
    }

    fn active_candidate(&self, ballot: usize) -> Option<usize> {
        self.rankings[ballot].get(self.cursor[ballot]).copied()
    }

    /// Current weight held by each candidate; zero for non-remaining ones.
    pub(crate) fn tally(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.candidates.len()];
        for ballot in 0..self.rankings.len() {
            if let Some(candidate) = self.active_candidate(ballot) {
                totals[candidate] += self.multiplicity[ballot] * self.weight[ballot];
            }
        }
        totals
    }

    pub(crate) fn active_weight(&self) -> f64 {
        (0..self.rankings.len())
            .filter(|&b| self.active_candidate(b).is_some())
            .map(|b| self.multiplicity[b] * self.weight[b])
            .sum()
    }

    pub(crate) fn exhausted_weight(&self) -> f64 {
        self.exhausted
    }

    pub(crate) fn retained_weight(&self) -> f64 {
        self.retained
    }

    pub(crate) fn mark(&mut self, candidate: usize, status: Status) {
        self.status[candidate] = status;
    }

    /// Moves every ballot sitting on `candidate` to its next remaining
    /// preference, keeping `factor` of its weight. The other share is
    /// retained by `candidate`.
    pub(crate) fn transfer(&mut self, candidate: usize, factor: f64) {
        for ballot in 0..self.rankings.len() {
            if self.active_candidate(ballot) != Some(candidate) {
                continue;
            }
            let value = self.multiplicity[ballot] * self.weight[ballot];
            self.retained += value * (1.0 - factor);
            self.weight[ballot] *= factor;
            self.advance(ballot);
        }
    }

    fn advance(&mut self, ballot: usize) {
        let ranking = &self.rankings[ballot];
        let mut cursor = self.cursor[ballot] + 1;
        while cursor < ranking.len() && self.status[ranking[cursor]] != Status::Remaining {
            cursor += 1;
        }
        self.cursor[ballot] = cursor;
        if cursor >= ranking.len() {
            self.exhausted += self.multiplicity[ballot] * self.weight[ballot];
        }
    }

    /// Orders candidates from most to least favoured: higher tally first,
    /// equal tallies by ascending identifier.
    pub(crate) fn favoured_order(&self, mut pool: Vec<usize>, tallies: &[f64]) -> Vec<usize> {
        pool.sort_by(|&a, &b| {
            compare_tally(tallies[b], tallies[a])
                .then_with(|| self.candidates[a].cmp(&self.candidates[b]))
        });
        pool
    }
}

/// Quantizes a tally so that floating noise below 1e-9 never decides a
/// comparison, while keeping the ordering total.
pub(crate) fn tally_key(tally: f64) -> i64 {
    (tally * TALLY_RESOLUTION).round() as i64
}

pub(crate) fn compare_tally(a: f64, b: f64) -> Ordering {
    tally_key(a).cmp(&tally_key(b))
}
