use std::collections::BTreeMap;

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::{sums_to_one, BlocId, SlateId};
use serde::{Deserialize, Serialize};

fn check_distribution(
    code: &str,
    owner: &str,
    values: impl Iterator<Item = (String, f64)>,
) -> Result<(), VoteError> {
    let mut sum = 0.0;
    let mut seen = 0usize;
    for (label, value) in values {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(VoteError::InvalidProportion(
                ErrorInfo::new(format!("{code}-range"), "probabilities must lie in [0, 1]")
                    .with_context("owner", owner)
                    .with_context("entry", label)
                    .with_context("value", value.to_string()),
            ));
        }
        sum += value;
        seen += 1;
    }
    if seen == 0 || !sums_to_one(sum) {
        return Err(VoteError::InvalidProportion(
            ErrorInfo::new(format!("{code}-sum"), "probabilities must sum to 1")
                .with_context("owner", owner)
                .with_context("sum", sum.to_string()),
        ));
    }
    Ok(())
}

/// Share of the electorate belonging to each bloc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<BlocId, f64>", into = "BTreeMap<BlocId, f64>")]
pub struct BlocProportions {
    shares: BTreeMap<BlocId, f64>,
}

impl BlocProportions {
    /// Validates that the shares are probabilities summing to one.
    pub fn new(shares: BTreeMap<BlocId, f64>) -> Result<Self, VoteError> {
        check_distribution(
            "bloc-share",
            "electorate",
            shares.iter().map(|(bloc, share)| (bloc.to_string(), *share)),
        )?;
        Ok(Self { shares })
    }

    /// Convenience constructor from `(label, share)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Self, VoteError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(label, share)| (BlocId::new(label), share))
                .collect(),
        )
    }

    /// Share of `bloc`, or zero when unknown.
    pub fn share(&self, bloc: &BlocId) -> f64 {
        self.shares.get(bloc).copied().unwrap_or(0.0)
    }

    /// Blocs in identifier order.
    pub fn blocs(&self) -> impl Iterator<Item = &BlocId> + '_ {
        self.shares.keys()
    }

    /// Iterates `(bloc, share)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&BlocId, f64)> + '_ {
        self.shares.iter().map(|(b, s)| (b, *s))
    }
}

impl TryFrom<BTreeMap<BlocId, f64>> for BlocProportions {
    type Error = VoteError;

    fn try_from(shares: BTreeMap<BlocId, f64>) -> Result<Self, Self::Error> {
        Self::new(shares)
    }
}

impl From<BlocProportions> for BTreeMap<BlocId, f64> {
    fn from(value: BlocProportions) -> Self {
        value.shares
    }
}

/// Per-bloc probability of attending to each slate.
///
/// A row is the distribution from which a bloc's slate ordering is drawn.
/// Slates absent from a row have probability zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<BlocId, BTreeMap<SlateId, f64>>",
    into = "BTreeMap<BlocId, BTreeMap<SlateId, f64>>"
)]
pub struct CohesionMatrix {
    rows: BTreeMap<BlocId, BTreeMap<SlateId, f64>>,
}

impl CohesionMatrix {
    /// Validates every row as a probability distribution.
    pub fn new(rows: BTreeMap<BlocId, BTreeMap<SlateId, f64>>) -> Result<Self, VoteError> {
        for (bloc, row) in &rows {
            check_distribution(
                "cohesion-row",
                bloc.as_str(),
                row.iter().map(|(slate, p)| (slate.to_string(), *p)),
            )?;
        }
        Ok(Self { rows })
    }

    /// Probability that `bloc` attends to `slate`.
    pub fn probability(&self, bloc: &BlocId, slate: &SlateId) -> f64 {
        self.rows
            .get(bloc)
            .and_then(|row| row.get(slate))
            .copied()
            .unwrap_or(0.0)
    }

    /// Blocs with a row, in identifier order.
    pub fn blocs(&self) -> impl Iterator<Item = &BlocId> + '_ {
        self.rows.keys()
    }

    /// Iterates the rows.
    pub fn rows(&self) -> impl Iterator<Item = (&BlocId, &BTreeMap<SlateId, f64>)> + '_ {
        self.rows.iter()
    }
}

impl TryFrom<BTreeMap<BlocId, BTreeMap<SlateId, f64>>> for CohesionMatrix {
    type Error = VoteError;

    fn try_from(rows: BTreeMap<BlocId, BTreeMap<SlateId, f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<CohesionMatrix> for BTreeMap<BlocId, BTreeMap<SlateId, f64>> {
    fn from(value: CohesionMatrix) -> Self {
        value.rows
    }
}
