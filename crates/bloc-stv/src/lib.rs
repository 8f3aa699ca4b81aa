#![deny(missing_docs)]
#![doc = "Single Transferable Vote tabulation over generated ballot profiles, plus the largest-remainder party-list benchmark."]

/// Party-list seat allocation.
pub mod party_list;
/// Quota formulas.
pub mod quota;
mod state;
/// The STV round loop and its outputs.
pub mod tabulate;

pub use party_list::party_list_seats;
pub use quota::QuotaKind;
pub use tabulate::{
    tabulate, DeadlockPolicy, ElectedCandidate, ElectedVia, EliminatedCandidate, RoundRecord,
    StvOptions, StvOutcome, StvTabulator,
};
