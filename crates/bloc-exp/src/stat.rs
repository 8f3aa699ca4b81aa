use std::collections::BTreeMap;

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::SlateId;
use serde::{Deserialize, Serialize};

use crate::sweep::SweepReport;
use crate::trial::TrialOutcome;

/// Per-job aggregate over its trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Trials aggregated.
    pub trials: usize,
    /// Mean STV seats per slate.
    pub mean_stv_seats: BTreeMap<SlateId, f64>,
    /// Mean party-list seats per slate.
    pub mean_party_list_seats: BTreeMap<SlateId, f64>,
    /// Mean first-preference vote share per slate.
    pub mean_first_preference_share: BTreeMap<SlateId, f64>,
    /// STV seat histogram per slate; entry `k` counts trials with `k` seats.
    pub stv_seat_histogram: BTreeMap<SlateId, Vec<u64>>,
    /// Mean number of counting rounds.
    pub mean_rounds: f64,
}

impl JobSummary {
    /// Aggregates `trials`, all counted for `seats` seats.
    pub fn from_trials(trials: &[TrialOutcome], seats: usize) -> Self {
        let count = trials.len();
        let mut stv_seats: BTreeMap<SlateId, f64> = BTreeMap::new();
        let mut list_seats: BTreeMap<SlateId, f64> = BTreeMap::new();
        let mut shares: BTreeMap<SlateId, f64> = BTreeMap::new();
        let mut histogram: BTreeMap<SlateId, Vec<u64>> = BTreeMap::new();
        let mut rounds = 0.0;

        for trial in trials {
            for (slate, won) in &trial.stv_seats {
                *stv_seats.entry(slate.clone()).or_insert(0.0) += *won as f64;
                let bins = histogram
                    .entry(slate.clone())
                    .or_insert_with(|| vec![0; seats + 1]);
                let bin = (*won as usize).min(seats);
                bins[bin] += 1;
            }
            for (slate, won) in &trial.party_list_seats {
                *list_seats.entry(slate.clone()).or_insert(0.0) += *won as f64;
            }
            let votes: u64 = trial.first_preferences.values().sum();
            for (slate, first) in &trial.first_preferences {
                let share = if votes == 0 {
                    0.0
                } else {
                    *first as f64 / votes as f64
                };
                *shares.entry(slate.clone()).or_insert(0.0) += share;
            }
            rounds += trial.stv.round_count as f64;
        }

        Self {
            trials: count,
            mean_stv_seats: mean_map(stv_seats, count),
            mean_party_list_seats: mean_map(list_seats, count),
            mean_first_preference_share: mean_map(shares, count),
            stv_seat_histogram: histogram,
            mean_rounds: mean(rounds, count),
        }
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn mean_map(totals: BTreeMap<SlateId, f64>, count: usize) -> BTreeMap<SlateId, f64> {
    totals
        .into_iter()
        .map(|(slate, total)| (slate, mean(total, count)))
        .collect()
}

/// Mean STV seats of one slate over a two-parameter grid, ready for a heat map.
///
/// Rows follow the first parameter's values, columns the second's. Cells of
/// jobs that did not complete are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatMatrix {
    /// Slate whose seats fill the cells.
    pub slate: SlateId,
    /// Row parameter name.
    pub row_parameter: String,
    /// Column parameter name.
    pub column_parameter: String,
    /// Row parameter values.
    pub rows: Vec<f64>,
    /// Column parameter values.
    pub columns: Vec<f64>,
    /// Cell values, row-major.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl SeatMatrix {
    /// Builds the matrix from a sweep report whose grid has exactly two
    /// parameters.
    pub fn from_report(
        report: &SweepReport,
        slate: &SlateId,
    ) -> Result<Self, VoteError> {
        let [row, column] = report.parameters.as_slice() else {
            return Err(VoteError::Config(
                ErrorInfo::new("matrix-shape", "a seat matrix needs exactly two grid parameters")
                    .with_context("parameters", report.parameters.len().to_string()),
            ));
        };
        let mut cells = vec![vec![None; column.values.len()]; row.values.len()];
        for job in &report.jobs {
            let Some(summary) = &job.summary else {
                continue;
            };
            let (Some(r), Some(c)) = (
                position(&row.values, job.params.get(&row.name)),
                position(&column.values, job.params.get(&column.name)),
            ) else {
                continue;
            };
            cells[r][c] = Some(summary.mean_stv_seats.get(slate).copied().unwrap_or(0.0));
        }
        Ok(Self {
            slate: slate.clone(),
            row_parameter: row.name.clone(),
            column_parameter: column.name.clone(),
            rows: row.values.clone(),
            columns: column.values.clone(),
            cells,
        })
    }
}

fn position(values: &[f64], value: Option<&f64>) -> Option<usize> {
    let value = value?;
    values.iter().position(|v| v.to_bits() == value.to_bits())
}
