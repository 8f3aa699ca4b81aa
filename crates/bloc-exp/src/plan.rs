use std::collections::BTreeMap;
use std::path::Path;

use bloc_ballot::{
    BlocAllocation, BlocProportions, CohesionMatrix, ElectionConfig, IntervalTable,
    PreferenceInterval,
};
use bloc_core::errors::VoteError;
use bloc_core::{BlocId, CandidateId, SlateId};
use bloc_stv::StvOptions;
use serde::{Deserialize, Serialize};

use crate::hash::stable_hash_string;
use crate::serde::{load_yaml, to_yaml_string};

/// One bloc of voters as written in an election file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlocSpec {
    /// Share of the electorate.
    pub proportion: f64,
    /// Probability of attending to each slate.
    pub cohesion: BTreeMap<SlateId, f64>,
    /// Candidate weights per slate. A slate left out gets uniform weights.
    #[serde(default)]
    pub preferences: BTreeMap<SlateId, BTreeMap<CandidateId, f64>>,
    /// Slate absorbing the cohesion residual when a sweep overrides this row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<SlateId>,
}

impl BlocSpec {
    /// Slate that absorbs `1 - sum(others)` under sweep overrides: the
    /// explicit `home`, or else the slate sharing the bloc's label.
    pub fn home_slate(&self, bloc: &BlocId) -> Option<SlateId> {
        self.home.clone().or_else(|| {
            let named = SlateId::new(bloc.as_str());
            self.cohesion.contains_key(&named).then_some(named)
        })
    }
}

/// Unvalidated electorate description loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Candidates fielded by each slate, in listing order.
    pub slates: BTreeMap<SlateId, Vec<CandidateId>>,
    /// Voting blocs.
    pub blocs: BTreeMap<BlocId, BlocSpec>,
    /// How ballots are split across blocs.
    #[serde(default)]
    pub allocation: BlocAllocation,
}

impl ElectionSpec {
    /// Validates the description into an [`ElectionConfig`].
    pub fn build(&self) -> Result<ElectionConfig, VoteError> {
        let proportions = BlocProportions::new(
            self.blocs
                .iter()
                .map(|(bloc, spec)| (bloc.clone(), spec.proportion))
                .collect(),
        )?;
        let cohesion = CohesionMatrix::new(
            self.blocs
                .iter()
                .map(|(bloc, spec)| (bloc.clone(), spec.cohesion.clone()))
                .collect(),
        )?;
        let mut intervals = IntervalTable::new();
        for (bloc, spec) in &self.blocs {
            let mut row = BTreeMap::new();
            for (slate, weights) in &spec.preferences {
                let interval = PreferenceInterval::new(weights.clone()).map_err(|err| {
                    err.with_context("bloc", bloc.as_str())
                        .with_context("slate", slate.as_str())
                })?;
                row.insert(slate.clone(), interval);
            }
            for (slate, members) in &self.slates {
                if row.contains_key(slate) || members.is_empty() {
                    continue;
                }
                let uniform = members.iter().map(|c| (c.clone(), 1.0)).collect();
                row.insert(slate.clone(), PreferenceInterval::new(uniform)?);
            }
            intervals.insert(bloc.clone(), row);
        }
        ElectionConfig::new(self.slates.clone(), intervals, proportions, cohesion)
    }
}

/// A single election run: electorate, ballot count, seats and counting rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionPlan {
    /// Electorate description.
    pub election: ElectionSpec,
    /// Ballots cast per trial.
    pub ballots: u64,
    /// Seats to fill.
    pub seats: usize,
    /// Counting rules.
    #[serde(default)]
    pub stv: StvOptions,
}

impl ElectionPlan {
    /// Deterministic hash of the plan contents.
    pub fn plan_hash(&self) -> Result<String, VoteError> {
        stable_hash_string(self)
    }

    /// Canonical YAML form of the plan.
    pub fn to_yaml_string(&self) -> Result<String, VoteError> {
        to_yaml_string(self)
    }
}

/// Loads an election plan from disk.
pub fn load_election_plan<P: AsRef<Path>>(path: P) -> Result<ElectionPlan, VoteError> {
    load_yaml(path.as_ref())
}
