use std::collections::{BTreeMap, BTreeSet};

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::{BlocId, CandidateId, SlateId};

use crate::cohesion::{BlocProportions, CohesionMatrix};
use crate::interval::PreferenceInterval;

/// Per-bloc, per-slate preference intervals.
pub type IntervalTable = BTreeMap<BlocId, BTreeMap<SlateId, PreferenceInterval>>;

fn config_error(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
}

/// Validated, immutable description of one simulated electorate.
///
/// Construction checks that slates, blocs, intervals and cohesion rows all
/// describe the same candidate field; afterwards the value is read-only and
/// may be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionConfig {
    slates: BTreeMap<SlateId, Vec<CandidateId>>,
    intervals: IntervalTable,
    proportions: BlocProportions,
    cohesion: CohesionMatrix,
    candidate_slate: BTreeMap<CandidateId, SlateId>,
}

impl ElectionConfig {
    /// Validates and assembles a configuration.
    pub fn new(
        slates: BTreeMap<SlateId, Vec<CandidateId>>,
        intervals: IntervalTable,
        proportions: BlocProportions,
        cohesion: CohesionMatrix,
    ) -> Result<Self, VoteError> {
        let candidate_slate = index_candidates(&slates)?;
        check_blocs(&intervals, &proportions, &cohesion)?;
        for (bloc, row) in cohesion.rows() {
            for slate in row.keys() {
                if !slates.contains_key(slate) {
                    return Err(VoteError::Config(
                        config_error("cohesion-unknown-slate", "cohesion row names an unknown slate")
                            .with_context("bloc", bloc.as_str())
                            .with_context("slate", slate.as_str()),
                    ));
                }
            }
        }
        for (bloc, by_slate) in &intervals {
            check_intervals(bloc, by_slate, &slates)?;
        }
        Ok(Self {
            slates,
            intervals,
            proportions,
            cohesion,
            candidate_slate,
        })
    }

    /// Slates with their ordered candidate lists.
    pub fn slates(&self) -> &BTreeMap<SlateId, Vec<CandidateId>> {
        &self.slates
    }

    /// Every candidate, grouped by slate in slate order.
    pub fn candidates(&self) -> Vec<CandidateId> {
        self.slates.values().flatten().cloned().collect()
    }

    /// Total number of candidates across all slates.
    pub fn candidate_count(&self) -> usize {
        self.candidate_slate.len()
    }

    /// Slate fielding `candidate`.
    pub fn slate_of(&self, candidate: &CandidateId) -> Option<&SlateId> {
        self.candidate_slate.get(candidate)
    }

    /// Bloc voter shares.
    pub fn proportions(&self) -> &BlocProportions {
        &self.proportions
    }

    /// Cohesion matrix.
    pub fn cohesion(&self) -> &CohesionMatrix {
        &self.cohesion
    }

    /// Interval used by `bloc` to rank the candidates of `slate`.
    pub fn interval(&self, bloc: &BlocId, slate: &SlateId) -> Option<&PreferenceInterval> {
        self.intervals.get(bloc).and_then(|row| row.get(slate))
    }

    /// Blocs in identifier order.
    pub fn blocs(&self) -> impl Iterator<Item = &BlocId> + '_ {
        self.proportions.blocs()
    }
}

fn index_candidates(
    slates: &BTreeMap<SlateId, Vec<CandidateId>>,
) -> Result<BTreeMap<CandidateId, SlateId>, VoteError> {
    if slates.is_empty() {
        return Err(VoteError::Config(config_error(
            "slates-empty",
            "at least one slate is required",
        )));
    }
    let mut index = BTreeMap::new();
    for (slate, members) in slates {
        if members.is_empty() {
            return Err(VoteError::Config(
                config_error("slate-empty", "slate fields no candidates")
                    .with_context("slate", slate.as_str()),
            ));
        }
        for candidate in members {
            if let Some(previous) = index.insert(candidate.clone(), slate.clone()) {
                return Err(VoteError::Config(
                    config_error("candidate-duplicate", "candidate appears more than once")
                        .with_context("candidate", candidate.as_str())
                        .with_context("first_slate", previous.as_str())
                        .with_context("second_slate", slate.as_str()),
                ));
            }
        }
    }
    Ok(index)
}

fn check_blocs(
    intervals: &IntervalTable,
    proportions: &BlocProportions,
    cohesion: &CohesionMatrix,
) -> Result<(), VoteError> {
    let from_shares: BTreeSet<&BlocId> = proportions.blocs().collect();
    let from_cohesion: BTreeSet<&BlocId> = cohesion.blocs().collect();
    let from_intervals: BTreeSet<&BlocId> = intervals.keys().collect();
    for (label, other) in [("cohesion", &from_cohesion), ("intervals", &from_intervals)] {
        if let Some(bloc) = from_shares.symmetric_difference(other).next() {
            return Err(VoteError::Config(
                config_error("bloc-mismatch", "bloc sets disagree")
                    .with_context("bloc", bloc.as_str())
                    .with_context("table", label)
                    .with_hint("every bloc needs a share, a cohesion row and intervals"),
            ));
        }
    }
    Ok(())
}

fn check_intervals(
    bloc: &BlocId,
    by_slate: &BTreeMap<SlateId, PreferenceInterval>,
    slates: &BTreeMap<SlateId, Vec<CandidateId>>,
) -> Result<(), VoteError> {
    if let Some(slate) = by_slate.keys().find(|slate| !slates.contains_key(*slate)) {
        return Err(VoteError::Config(
            config_error("interval-unknown-slate", "interval names an unknown slate")
                .with_context("bloc", bloc.as_str())
                .with_context("slate", slate.as_str()),
        ));
    }
    for (slate, members) in slates {
        let interval = by_slate.get(slate).ok_or_else(|| {
            VoteError::Config(
                config_error("interval-missing", "bloc has no interval for slate")
                    .with_context("bloc", bloc.as_str())
                    .with_context("slate", slate.as_str()),
            )
        })?;
        let expected: BTreeSet<&CandidateId> = members.iter().collect();
        let actual: BTreeSet<&CandidateId> = interval.candidates().collect();
        if expected != actual {
            let stray = expected
                .symmetric_difference(&actual)
                .next()
                .map(|c| c.to_string())
                .unwrap_or_default();
            return Err(VoteError::Config(
                config_error(
                    "interval-candidate-mismatch",
                    "interval must cover exactly the slate's candidates",
                )
                .with_context("bloc", bloc.as_str())
                .with_context("slate", slate.as_str())
                .with_context("candidate", stray),
            ));
        }
    }
    Ok(())
}
