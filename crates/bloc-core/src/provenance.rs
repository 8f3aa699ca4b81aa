//! Provenance stamped on every simulator report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema of the JSON reports written by this version of the simulator.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Semantic version of a serialized payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Bumped when a field is removed or changes meaning.
    pub major: u32,
    /// Bumped when fields are added.
    pub minor: u32,
    /// Bumped for fixes that keep the layout.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Where a report came from: which input, which seed, which build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProvenance {
    /// Stable hash of the plan (and seed) that produced the report.
    pub input_hash: String,
    /// Master seed; every random draw in the run derives from it.
    pub seed: u64,
    /// Report layout.
    pub schema: SchemaVersion,
    /// Simulator version that wrote the report.
    pub simulator_version: String,
}

impl RunProvenance {
    /// Stamps `input_hash` and `seed` with the current schema and version.
    pub fn new(input_hash: impl Into<String>, seed: u64) -> Self {
        Self {
            input_hash: input_hash.into(),
            seed,
            schema: REPORT_SCHEMA,
            simulator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
