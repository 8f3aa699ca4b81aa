//! Weighted sampling without replacement.
//!
//! Both levels of the ballot model (slate order, then candidate order within a
//! slate) are the same "draw one, remove, renormalize, repeat" process over a
//! weight vector. Once every remaining weight is zero the leftovers are
//! appended in uniformly random order, so zero-weight items are never dropped.

use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a full permutation of `0..weights.len()` drawn by repeated
/// proportional selection without replacement.
///
/// Weights must be finite and non-negative; they need not be normalized.
pub fn draw_without_replacement<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Vec<usize> {
    debug_assert!(weights.iter().all(|w| w.is_finite() && *w >= 0.0));
    let mut remaining: Vec<usize> = (0..weights.len()).collect();
    let mut order = Vec::with_capacity(weights.len());
    while !remaining.is_empty() {
        if remaining.len() == 1 {
            order.push(remaining[0]);
            break;
        }
        let total: f64 = remaining.iter().map(|&idx| weights[idx]).sum();
        if total <= 0.0 {
            remaining.shuffle(rng);
            order.append(&mut remaining);
            break;
        }
        let pos = draw_position(&remaining, weights, total, rng);
        order.push(remaining.remove(pos));
    }
    order
}

fn draw_position<R: Rng + ?Sized>(
    remaining: &[usize],
    weights: &[f64],
    total: f64,
    rng: &mut R,
) -> usize {
    let target = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    let mut last_positive = 0;
    for (pos, &idx) in remaining.iter().enumerate() {
        let weight = weights[idx];
        if weight <= 0.0 {
            continue;
        }
        acc += weight;
        last_positive = pos;
        if target < acc {
            return pos;
        }
    }
    // rounding can leave target == acc at the very end
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloc_core::RngHandle;

    #[test]
    fn zero_weights_trail_positive_ones() {
        let mut rng = RngHandle::from_seed(11);
        for _ in 0..200 {
            let order = draw_without_replacement(&[0.0, 1.0, 0.0, 0.0], &mut rng);
            assert_eq!(order[0], 1);
            let mut sorted = order.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn single_item_needs_no_randomness() {
        let mut rng = RngHandle::from_seed(5);
        assert_eq!(draw_without_replacement(&[0.3], &mut rng), vec![0]);
        assert!(draw_without_replacement(&[], &mut rng).is_empty());
    }

    #[test]
    fn first_pick_follows_weights() {
        let mut rng = RngHandle::from_seed(3);
        let mut hits = [0u32; 2];
        for _ in 0..4_000 {
            hits[draw_without_replacement(&[0.8, 0.2], &mut rng)[0]] += 1;
        }
        let share = f64::from(hits[0]) / 4_000.0;
        assert!((share - 0.8).abs() < 0.05, "share {share}");
    }
}
