//! Largest-remainder party-list benchmark.

use std::collections::BTreeMap;

use bloc_core::errors::VoteError;
use bloc_core::{largest_remainder, SlateId};

/// Seats each slate would win under a closed party list allocated by largest
/// remainder on `votes`. Every slate in `votes` appears in the result.
pub fn party_list_seats(
    votes: &BTreeMap<SlateId, u64>,
    seats: u64,
) -> Result<BTreeMap<SlateId, u64>, VoteError> {
    let as_float: BTreeMap<SlateId, f64> = votes
        .iter()
        .map(|(slate, count)| (slate.clone(), *count as f64))
        .collect();
    largest_remainder(&as_float, seats)
}
