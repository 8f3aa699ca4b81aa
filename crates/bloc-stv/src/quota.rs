use serde::{Deserialize, Serialize};

/// Election threshold formula, fixed before the first round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuotaKind {
    /// `floor(ballots / (seats + 1)) + 1`.
    #[default]
    Droop,
    /// `ballots / seats`, left fractional.
    Hare,
}

impl QuotaKind {
    /// Threshold for `ballots` ballots and `seats` seats (`seats > 0`).
    pub fn threshold(self, ballots: u64, seats: usize) -> f64 {
        let seats = seats as u64;
        match self {
            QuotaKind::Droop => (ballots / (seats + 1) + 1) as f64,
            QuotaKind::Hare => ballots as f64 / seats as f64,
        }
    }
}
