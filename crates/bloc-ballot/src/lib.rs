#![deny(missing_docs)]
#![doc = "Ballot generation for bloc cohesion studies: preference intervals, cohesion, and the slate-weighted Plackett-Luce sampler."]

/// Per-bloc slate attention and electorate shares.
pub mod cohesion;
/// Validated electorate configuration.
pub mod config;
/// The slate-weighted Plackett-Luce generator.
pub mod generator;
/// Normalized candidate weights.
pub mod interval;
/// Ballots and ballot multisets.
pub mod profile;
/// Weighted sampling without replacement.
pub mod sampling;

pub use cohesion::{BlocProportions, CohesionMatrix};
pub use config::{ElectionConfig, IntervalTable};
pub use generator::{BlocAllocation, SlatePlackettLuce};
pub use interval::PreferenceInterval;
pub use profile::{Ballot, BallotProfile, ProfileEntry};
pub use sampling::draw_without_replacement;
