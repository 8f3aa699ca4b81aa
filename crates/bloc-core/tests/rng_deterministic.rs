use bloc_core::rng::{derive_substream_seed, job_seed, trial_seed, RngHandle};
use rand::RngCore;

#[test]
fn rng_emits_reproducible_sequence() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1234);

    let seq_a: Vec<u64> = (0..100).map(|_| rng_a.next_u64()).collect();
    let seq_b: Vec<u64> = (0..100).map(|_| rng_b.next_u64()).collect();

    assert_eq!(seq_a, seq_b);
    assert_eq!(rng_a.seed(), 1234);
}

#[test]
fn substreams_are_stable_and_distinct() {
    assert_eq!(derive_substream_seed(7, 0), derive_substream_seed(7, 0));
    assert_ne!(derive_substream_seed(7, 0), derive_substream_seed(7, 1));
    assert_ne!(derive_substream_seed(7, 0), derive_substream_seed(8, 0));
    assert_ne!(derive_substream_seed(3, 9), derive_substream_seed(9, 3));
}

#[test]
fn job_and_trial_seeds_form_a_tree() {
    let jobs: Vec<u64> = (0..4).map(|job| job_seed(42, job)).collect();
    for (idx, seed) in jobs.iter().enumerate() {
        assert!(!jobs[idx + 1..].contains(seed));
    }
    assert_eq!(trial_seed(jobs[1], 2), derive_substream_seed(job_seed(42, 1), 2));
    assert_ne!(trial_seed(jobs[0], 0), trial_seed(jobs[1], 0));
}
