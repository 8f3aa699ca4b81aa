//! Seeding policy for simulations.
//!
//! One master seed fans out into a tree: a sweep derives one seed per job from
//! the master, and each job derives one seed per trial from its own seed. A
//! trial owns its [`RngHandle`] outright, so trials can run on any thread in
//! any order and still draw the same ballots.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// `StdRng` that remembers the seed it started from.
#[derive(Debug, Clone)]
pub struct RngHandle {
    seed: u64,
    rng: StdRng,
}

impl RngHandle {
    /// Creates a handle seeded with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed this handle started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of child stream `index` under `parent`: SipHash-1-3 with zero keys
/// over the little-endian bytes of both, identical on every platform.
pub fn derive_substream_seed(parent: u64, index: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write(&parent.to_le_bytes());
    hasher.write(&index.to_le_bytes());
    hasher.finish()
}

/// Seed of job `job` in a sweep started from `master`.
pub fn job_seed(master: u64, job: usize) -> u64 {
    derive_substream_seed(master, job as u64)
}

/// Seed of trial `trial` within the job seeded with `job_seed`.
pub fn trial_seed(job_seed: u64, trial: usize) -> u64 {
    derive_substream_seed(job_seed, trial as u64)
}
