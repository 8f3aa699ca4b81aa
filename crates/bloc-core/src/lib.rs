#![deny(missing_docs)]
#![doc = "Core identifiers, errors and seeding policy shared by the bloc cohesion simulator crates."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod apportion;
pub mod errors;
pub mod provenance;
pub mod rng;

pub use apportion::largest_remainder;
pub use errors::{ErrorInfo, VoteError};
pub use provenance::{RunProvenance, SchemaVersion, REPORT_SCHEMA};
pub use rng::{derive_substream_seed, job_seed, trial_seed, RngHandle};

/// Absolute tolerance used when checking that a distribution sums to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from its label.
            pub fn new(label: impl Into<String>) -> Self {
                Self(label.into())
            }

            /// Returns the label backing the identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self::new(label)
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                Self(label)
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a candidate standing for election.
    CandidateId
);
string_id!(
    /// Identifier of a slate (the candidates fielded by one party).
    SlateId
);
string_id!(
    /// Identifier of a voting bloc.
    BlocId
);

/// Returns true when `sum` is within [`SUM_TOLERANCE`] of one.
pub fn sums_to_one(sum: f64) -> bool {
    (sum - 1.0).abs() <= SUM_TOLERANCE
}
