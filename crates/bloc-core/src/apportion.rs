//! Largest-remainder (Hamilton) apportionment.

use std::collections::BTreeMap;

use crate::errors::{ErrorInfo, VoteError};

/// Distributes `seats` among the keys of `votes` by the largest-remainder
/// method.
///
/// Each key first receives the integer part of its exact quota
/// `votes * seats / total`; leftover seats go to the largest fractional
/// remainders. Remainder ties are broken by larger raw vote, then by the
/// smaller key. Every key in `votes` is present in the result, and the
/// returned counts always sum to `seats`.
pub fn largest_remainder<K>(votes: &BTreeMap<K, f64>, seats: u64) -> Result<BTreeMap<K, u64>, VoteError>
where
    K: Ord + Clone + std::fmt::Display,
{
    if votes.is_empty() {
        return Err(VoteError::InvalidProportion(ErrorInfo::new(
            "apportion-empty",
            "cannot apportion seats among zero parties",
        )));
    }
    for (key, value) in votes {
        if !value.is_finite() || *value < 0.0 {
            return Err(VoteError::InvalidProportion(
                ErrorInfo::new("apportion-negative", "vote totals must be finite and non-negative")
                    .with_context("party", key.to_string())
                    .with_context("votes", value.to_string()),
            ));
        }
    }
    let total: f64 = votes.values().sum();
    if total <= 0.0 {
        return Err(VoteError::InvalidProportion(
            ErrorInfo::new("apportion-zero-total", "vote totals sum to zero")
                .with_context("seats", seats.to_string()),
        ));
    }

    let mut allocation = BTreeMap::new();
    let mut remainders = Vec::with_capacity(votes.len());
    let mut assigned = 0u64;
    for (key, value) in votes {
        let exact = value * seats as f64 / total;
        let whole = exact.floor();
        let whole_seats = whole as u64;
        assigned += whole_seats;
        allocation.insert(key.clone(), whole_seats);
        remainders.push((key, exact - whole, *value));
    }

    remainders.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| b.2.total_cmp(&a.2))
            .then_with(|| a.0.cmp(b.0))
    });

    let leftover = seats.saturating_sub(assigned) as usize;
    for (key, _, _) in remainders.into_iter().cycle().take(leftover) {
        if let Some(slot) = allocation.get_mut(key) {
            *slot += 1;
        }
    }
    Ok(allocation)
}
