use std::collections::BTreeMap;

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::{largest_remainder, BlocId, CandidateId};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ElectionConfig;
use crate::profile::{Ballot, BallotProfile};
use crate::sampling::draw_without_replacement;

/// How the requested ballots are divided among blocs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlocAllocation {
    /// Every ballot draws its bloc independently from the bloc shares.
    #[default]
    Sampled,
    /// Ballot counts per bloc are fixed up front by largest remainder.
    Apportioned,
}

#[derive(Debug, Clone)]
struct CompiledBloc {
    id: BlocId,
    share: f64,
    slate_weights: Vec<f64>,
    candidate_weights: Vec<Vec<f64>>,
}

/// Slate-weighted Plackett-Luce ballot generator.
///
/// A voter first orders the slates by repeated draws from its bloc's cohesion
/// row, then ranks each slate's candidates by a Plackett-Luce draw from the
/// bloc's interval for that slate. The slate segments are concatenated, so
/// every ballot ranks every candidate exactly once.
#[derive(Debug, Clone)]
pub struct SlatePlackettLuce {
    candidates: Vec<CandidateId>,
    slate_members: Vec<Vec<usize>>,
    blocs: Vec<CompiledBloc>,
    allocation: BlocAllocation,
}

impl SlatePlackettLuce {
    /// Compiles the configuration into index-based sampling tables.
    pub fn new(config: &ElectionConfig) -> Self {
        let mut candidates = Vec::with_capacity(config.candidate_count());
        let mut slate_members = Vec::with_capacity(config.slates().len());
        for members in config.slates().values() {
            let start = candidates.len();
            candidates.extend(members.iter().cloned());
            slate_members.push((start..candidates.len()).collect());
        }

        let blocs = config
            .blocs()
            .map(|bloc| {
                let slate_weights = config
                    .slates()
                    .keys()
                    .map(|slate| config.cohesion().probability(bloc, slate))
                    .collect();
                let candidate_weights = config
                    .slates()
                    .iter()
                    .map(|(slate, members)| {
                        let interval = config.interval(bloc, slate);
                        members
                            .iter()
                            .map(|c| interval.and_then(|i| i.weight(c)).unwrap_or(0.0))
                            .collect()
                    })
                    .collect();
                CompiledBloc {
                    id: bloc.clone(),
                    share: config.proportions().share(bloc),
                    slate_weights,
                    candidate_weights,
                }
            })
            .collect();

        Self {
            candidates,
            slate_members,
            blocs,
            allocation: BlocAllocation::default(),
        }
    }

    /// Selects how ballots are split among blocs.
    pub fn with_allocation(mut self, allocation: BlocAllocation) -> Self {
        self.allocation = allocation;
        self
    }

    /// Candidates in the generator's internal index order.
    pub fn candidates(&self) -> &[CandidateId] {
        &self.candidates
    }

    /// Draws one ballot for a voter of `bloc`.
    pub fn generate_ballot<R: Rng + ?Sized>(
        &self,
        bloc: &BlocId,
        rng: &mut R,
    ) -> Result<Ballot, VoteError> {
        let idx = self
            .blocs
            .iter()
            .position(|b| &b.id == bloc)
            .ok_or_else(|| {
                VoteError::Config(
                    ErrorInfo::new("bloc-unknown", "no such bloc").with_context("bloc", bloc.as_str()),
                )
            })?;
        Ok(self.to_ballot(&self.draw_indices(idx, rng)))
    }

    /// Generates `ballots` ballots and aggregates identical rankings.
    pub fn generate_profile<R: Rng + ?Sized>(
        &self,
        ballots: u64,
        rng: &mut R,
    ) -> Result<BallotProfile, VoteError> {
        if ballots == 0 {
            return Err(VoteError::Config(ErrorInfo::new(
                "ballot-count-zero",
                "at least one ballot must be requested",
            )));
        }
        let mut tallies: BTreeMap<Vec<usize>, u64> = BTreeMap::new();
        match self.allocation {
            BlocAllocation::Sampled => {
                let shares: Vec<f64> = self.blocs.iter().map(|b| b.share).collect();
                let dist = WeightedIndex::new(&shares).map_err(|err| {
                    VoteError::InvalidProportion(ErrorInfo::new("bloc-share-sample", err.to_string()))
                })?;
                for _ in 0..ballots {
                    let bloc = dist.sample(rng);
                    *tallies.entry(self.draw_indices(bloc, rng)).or_insert(0) += 1;
                }
            }
            BlocAllocation::Apportioned => {
                let shares: BTreeMap<usize, f64> =
                    self.blocs.iter().map(|b| b.share).enumerate().collect();
                for (bloc, count) in largest_remainder(&shares, ballots)? {
                    for _ in 0..count {
                        *tallies.entry(self.draw_indices(bloc, rng)).or_insert(0) += 1;
                    }
                }
            }
        }
        debug!(
            ballots,
            distinct = tallies.len(),
            allocation = ?self.allocation,
            "generated ballot profile"
        );
        Ok(tallies
            .into_iter()
            .map(|(indices, count)| (self.to_ballot(&indices), count))
            .collect())
    }

    fn draw_indices<R: Rng + ?Sized>(&self, bloc: usize, rng: &mut R) -> Vec<usize> {
        let compiled = &self.blocs[bloc];
        let mut ranking = Vec::with_capacity(self.candidates.len());
        for slate in draw_without_replacement(&compiled.slate_weights, rng) {
            let members = &self.slate_members[slate];
            for pos in draw_without_replacement(&compiled.candidate_weights[slate], rng) {
                ranking.push(members[pos]);
            }
        }
        ranking
    }

    fn to_ballot(&self, indices: &[usize]) -> Ballot {
        Ballot::from_unique(indices.iter().map(|&i| self.candidates[i].clone()).collect())
    }
}
