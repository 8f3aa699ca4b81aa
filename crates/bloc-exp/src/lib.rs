#![deny(missing_docs)]
#![doc = "Election files, single trials and deterministic cohesion sweeps on top of the ballot generator and STV counter."]

pub mod demo;
/// Stable hashing of serializable payloads.
pub mod hash;
/// YAML election descriptions.
pub mod plan;
/// Canonical JSON and YAML helpers.
pub mod serde;
/// Per-job aggregates and seat matrices.
pub mod stat;
/// Grid sweeps over cohesion parameters.
pub mod sweep;
/// One simulated election end to end.
pub mod trial;

pub use demo::{demo_election, demo_plan, demo_sweep_plan, CrossOver};
pub use hash::stable_hash_string;
pub use plan::{load_election_plan, BlocSpec, ElectionPlan, ElectionSpec};
pub use stat::{JobSummary, SeatMatrix};
pub use sweep::{
    load_sweep_plan, sweep, write_sweep_report, CohesionParameter, JobStatus, Scheduler,
    SweepJobReport, SweepMetrics, SweepPlan, SweepReport,
};
pub use trial::{
    run_election, run_trial, write_election_report, ElectionReport, TrialOutcome, TrialSettings,
};
