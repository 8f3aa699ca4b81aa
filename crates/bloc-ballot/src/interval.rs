use std::collections::BTreeMap;

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::CandidateId;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampling::draw_without_replacement;

/// Normalized preference weights over the candidates of one slate, as seen by
/// one voting bloc.
///
/// Candidates with zero weight are kept: they still appear in every sampled
/// ranking, after all positively weighted candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<CandidateId, f64>",
    into = "BTreeMap<CandidateId, f64>"
)]
pub struct PreferenceInterval {
    weights: BTreeMap<CandidateId, f64>,
}

impl PreferenceInterval {
    /// Builds an interval from raw, possibly unnormalized, weights.
    pub fn new(weights: BTreeMap<CandidateId, f64>) -> Result<Self, VoteError> {
        if weights.is_empty() {
            return Err(VoteError::InvalidWeight(ErrorInfo::new(
                "interval-empty",
                "preference interval names no candidates",
            )));
        }
        for (candidate, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(VoteError::InvalidWeight(
                    ErrorInfo::new("interval-negative", "weights must be finite and non-negative")
                        .with_context("candidate", candidate.as_str())
                        .with_context("weight", weight.to_string()),
                ));
            }
        }
        let total: f64 = weights.values().sum();
        if total <= 0.0 {
            return Err(VoteError::InvalidWeight(
                ErrorInfo::new("interval-all-zero", "all weights are zero")
                    .with_context("candidates", weights.len().to_string())
                    .with_hint("give at least one candidate positive support"),
            ));
        }
        let weights = weights
            .into_iter()
            .map(|(candidate, weight)| (candidate, weight / total))
            .collect();
        Ok(Self { weights })
    }

    /// Convenience constructor from `(label, weight)` pairs.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, VoteError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, weight)| (CandidateId::new(label), weight))
                .collect(),
        )
    }

    /// Normalized weight of `candidate`, if it belongs to the interval.
    pub fn weight(&self, candidate: &CandidateId) -> Option<f64> {
        self.weights.get(candidate).copied()
    }

    /// Candidates covered by the interval in identifier order.
    pub fn candidates(&self) -> impl Iterator<Item = &CandidateId> + '_ {
        self.weights.keys()
    }

    /// Iterates `(candidate, weight)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&CandidateId, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (c, *w))
    }

    /// Number of candidates in the interval.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a constructed interval.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Draws a Plackett-Luce ranking of every candidate in the interval.
    pub fn sample_ranking<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<CandidateId> {
        let candidates: Vec<&CandidateId> = self.weights.keys().collect();
        let weights: Vec<f64> = self.weights.values().copied().collect();
        draw_without_replacement(&weights, rng)
            .into_iter()
            .map(|idx| candidates[idx].clone())
            .collect()
    }
}

impl TryFrom<BTreeMap<CandidateId, f64>> for PreferenceInterval {
    type Error = VoteError;

    fn try_from(weights: BTreeMap<CandidateId, f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<PreferenceInterval> for BTreeMap<CandidateId, f64> {
    fn from(interval: PreferenceInterval) -> Self {
        interval.weights
    }
}
