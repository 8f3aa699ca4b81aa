use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use bloc_core::errors::{ErrorInfo, VoteError};
use bloc_core::{job_seed, trial_seed, BlocId, RunProvenance, SlateId, SUM_TOLERANCE};
use bloc_stv::StvOptions;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::hash::stable_hash_string;
use crate::plan::ElectionSpec;
use crate::serde::{load_yaml, write_canonical_json};
use crate::stat::JobSummary;
use crate::trial::{run_trial, TrialOutcome, TrialSettings};

/// File name of the report written by [`write_sweep_report`].
pub const SWEEP_REPORT_FILE: &str = "sweep_report.json";

/// Scheduler configuration controlling sweep execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Worker threads running jobs concurrently.
    #[serde(default = "Scheduler::default_parallelism")]
    pub parallelism: usize,
}

impl Scheduler {
    const fn default_parallelism() -> usize {
        1
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            parallelism: Self::default_parallelism(),
        }
    }
}

/// One swept cohesion cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohesionParameter {
    /// Name used in job parameter maps.
    pub name: String,
    /// Bloc whose cohesion row is overridden.
    pub bloc: BlocId,
    /// Slate whose probability takes each value in turn.
    pub slate: SlateId,
    /// Values visited, in order.
    pub values: Vec<f64>,
}

/// Grid sweep over cohesion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    /// Base electorate; swept cells override its cohesion rows.
    pub election: ElectionSpec,
    /// Ballots per trial.
    pub ballots: u64,
    /// Seats per trial.
    pub seats: usize,
    /// Trials per grid point.
    #[serde(default = "SweepPlan::default_trials")]
    pub trials: usize,
    /// Counting rules.
    #[serde(default)]
    pub stv: StvOptions,
    /// Grid axes, expanded with the first parameter varying slowest.
    #[serde(default)]
    pub parameters: Vec<CohesionParameter>,
    /// Execution settings.
    #[serde(default)]
    pub scheduler: Scheduler,
}

impl SweepPlan {
    const fn default_trials() -> usize {
        1
    }

    /// Checks the grid against the base electorate. Problems that would make
    /// every job meaningless are rejected here; per-point problems surface as
    /// invalid jobs instead.
    pub fn validate(&self) -> Result<(), VoteError> {
        if self.trials == 0 {
            return Err(plan_error("sweep-trials-zero", "at least one trial per job is required"));
        }
        let mut names = BTreeSet::new();
        for parameter in &self.parameters {
            if !names.insert(parameter.name.as_str()) {
                return Err(VoteError::Config(
                    ErrorInfo::new("sweep-parameter-duplicate", "parameter names must be unique")
                        .with_context("parameter", parameter.name.as_str()),
                ));
            }
            if parameter.values.is_empty() {
                return Err(VoteError::Config(
                    ErrorInfo::new("sweep-parameter-empty", "parameter lists no values")
                        .with_context("parameter", parameter.name.as_str()),
                ));
            }
            let bloc = self.election.blocs.get(&parameter.bloc).ok_or_else(|| {
                VoteError::Config(
                    ErrorInfo::new("sweep-unknown-bloc", "parameter targets an unknown bloc")
                        .with_context("parameter", parameter.name.as_str())
                        .with_context("bloc", parameter.bloc.as_str()),
                )
            })?;
            let home = bloc.home_slate(&parameter.bloc).ok_or_else(|| {
                VoteError::Config(
                    ErrorInfo::new("sweep-home-missing", "swept bloc has no home slate")
                        .with_context("bloc", parameter.bloc.as_str())
                        .with_hint("set `home` on the bloc or name a slate after it"),
                )
            })?;
            if home == parameter.slate {
                return Err(VoteError::Config(
                    ErrorInfo::new("sweep-parameter-home", "the home slate cannot be swept")
                        .with_context("parameter", parameter.name.as_str())
                        .with_context("slate", home.as_str())
                        .with_hint("the home slate absorbs the residual of the swept cells"),
                ));
            }
        }
        Ok(())
    }

    /// Expands the grid into per-job parameter maps, in job order.
    pub fn expand(&self) -> Vec<BTreeMap<String, f64>> {
        let mut outputs = Vec::new();
        expand_grid(&self.parameters, 0, BTreeMap::new(), &mut outputs);
        outputs
    }

    /// Base electorate with one grid point applied.
    ///
    /// Each overridden bloc's home slate takes `1 - sum(others)`. A negative
    /// residual is an error, never clamped.
    pub fn election_at(&self, params: &BTreeMap<String, f64>) -> Result<ElectionSpec, VoteError> {
        let mut election = self.election.clone();
        let mut touched = BTreeSet::new();
        for parameter in &self.parameters {
            let value = params.get(&parameter.name).copied().ok_or_else(|| {
                VoteError::Config(
                    ErrorInfo::new("sweep-parameter-missing", "grid point lacks a parameter")
                        .with_context("parameter", parameter.name.as_str()),
                )
            })?;
            let bloc = election.blocs.get_mut(&parameter.bloc).ok_or_else(|| {
                plan_error("sweep-unknown-bloc", "parameter targets an unknown bloc")
                    .with_context("bloc", parameter.bloc.as_str())
            })?;
            bloc.cohesion.insert(parameter.slate.clone(), value);
            touched.insert(parameter.bloc.clone());
        }
        for bloc_id in touched {
            let Some(bloc) = election.blocs.get_mut(&bloc_id) else {
                continue;
            };
            let home = bloc.home_slate(&bloc_id).ok_or_else(|| {
                plan_error("sweep-home-missing", "swept bloc has no home slate")
                    .with_context("bloc", bloc_id.as_str())
            })?;
            let others: f64 = bloc
                .cohesion
                .iter()
                .filter(|(slate, _)| **slate != home)
                .map(|(_, p)| *p)
                .sum();
            let residual = 1.0 - others;
            if residual < -SUM_TOLERANCE {
                return Err(VoteError::InvalidProportion(
                    ErrorInfo::new(
                        "cohesion-residual-negative",
                        "swept cells leave a negative share for the home slate",
                    )
                    .with_context("bloc", bloc_id.as_str())
                    .with_context("home", home.as_str())
                    .with_context("residual", residual.to_string()),
                ));
            }
            bloc.cohesion.insert(home, residual.max(0.0));
        }
        Ok(election)
    }

    /// Settings shared by every trial of the sweep.
    pub fn trial_settings(&self) -> TrialSettings {
        TrialSettings {
            ballots: self.ballots,
            seats: self.seats,
            stv: self.stv,
            allocation: self.election.allocation,
        }
    }
}

fn plan_error(code: &str, message: &str) -> VoteError {
    VoteError::Config(ErrorInfo::new(code, message))
}

fn expand_grid(
    params: &[CohesionParameter],
    idx: usize,
    current: BTreeMap<String, f64>,
    outputs: &mut Vec<BTreeMap<String, f64>>,
) {
    if idx == params.len() {
        outputs.push(current);
        return;
    }
    let param = &params[idx];
    for value in &param.values {
        let mut next = current.clone();
        next.insert(param.name.clone(), *value);
        expand_grid(params, idx + 1, next, outputs);
    }
}

/// Terminal state of a sweep job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Every trial ran.
    Completed,
    /// The grid point does not describe a valid electorate.
    Invalid,
    /// The electorate was valid but a trial failed.
    Failed,
}

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJobReport {
    /// Position in the expanded grid.
    pub index: usize,
    /// Parameter values of the grid point.
    pub params: BTreeMap<String, f64>,
    /// Job seed; trial seeds derive from it.
    pub seed: u64,
    /// Terminal state.
    pub status: JobStatus,
    /// Why the job is invalid or failed, with its family and code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<VoteError>,
    /// Aggregates, for completed jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<JobSummary>,
}

/// Job counts for a finished sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepMetrics {
    /// Jobs in the grid.
    pub jobs: usize,
    /// Jobs that completed.
    pub completed: usize,
    /// Jobs rejected as invalid grid points.
    pub invalid: usize,
    /// Jobs whose trials failed.
    pub failed: usize,
    /// Trials per job.
    pub trials_per_job: usize,
    /// Worker threads used.
    pub parallelism: usize,
}

/// Aggregate sweep report persisted for reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Input hash, master seed and schema.
    pub provenance: RunProvenance,
    /// Stable hash over the plan and seed.
    pub plan_hash: String,
    /// Grid axes, as planned.
    pub parameters: Vec<CohesionParameter>,
    /// Jobs in grid order.
    pub jobs: Vec<SweepJobReport>,
    /// Job counts.
    pub metrics: SweepMetrics,
}

/// Executes a deterministic sweep described by [`SweepPlan`].
///
/// Results depend only on the plan and `seed`; the thread count changes
/// wall time, not output.
pub fn sweep(plan: &SweepPlan, seed: u64) -> Result<SweepReport, VoteError> {
    plan.validate()?;
    let plan_hash = stable_hash_string(&(plan, seed))?;
    let grid = plan.expand();
    let parallelism = plan.scheduler.parallelism.max(1);
    info!(
        jobs = grid.len(),
        trials = plan.trials,
        parallelism,
        plan_hash = %plan_hash,
        "starting sweep"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()
        .map_err(|err| {
            VoteError::Config(
                ErrorInfo::new("sweep-thread-pool", err.to_string())
                    .with_context("parallelism", parallelism.to_string()),
            )
        })?;
    let total = grid.len();
    let mut ordered: Vec<(usize, SweepJobReport)> = pool.install(|| {
        grid.into_par_iter()
            .enumerate()
            .map(|(index, params)| {
                let report = run_job(plan, index, params, job_seed(seed, index));
                info!(
                    job = index + 1,
                    of = total,
                    status = ?report.status,
                    "sweep job finished"
                );
                (index, report)
            })
            .collect()
    });
    ordered.sort_by_key(|(index, _)| *index);
    let jobs: Vec<SweepJobReport> = ordered.into_iter().map(|(_, report)| report).collect();

    let count = |status: JobStatus| jobs.iter().filter(|job| job.status == status).count();
    let metrics = SweepMetrics {
        jobs: jobs.len(),
        completed: count(JobStatus::Completed),
        invalid: count(JobStatus::Invalid),
        failed: count(JobStatus::Failed),
        trials_per_job: plan.trials,
        parallelism,
    };
    info!(
        completed = metrics.completed,
        invalid = metrics.invalid,
        failed = metrics.failed,
        "sweep finished"
    );

    Ok(SweepReport {
        provenance: RunProvenance::new(plan_hash.clone(), seed),
        plan_hash,
        parameters: plan.parameters.clone(),
        jobs,
        metrics,
    })
}

fn run_job(
    plan: &SweepPlan,
    index: usize,
    params: BTreeMap<String, f64>,
    seed: u64,
) -> SweepJobReport {
    let mut report = SweepJobReport {
        index,
        params,
        seed,
        status: JobStatus::Completed,
        error: None,
        summary: None,
    };
    let config = match plan.election_at(&report.params).and_then(|e| e.build()) {
        Ok(config) => config,
        Err(err) => {
            warn!(job = index, error = %err, "invalid grid point");
            report.status = JobStatus::Invalid;
            report.error = Some(err.with_context("job", index.to_string()));
            return report;
        }
    };

    let settings = plan.trial_settings();
    let mut trials: Vec<TrialOutcome> = Vec::with_capacity(plan.trials);
    for trial in 0..plan.trials {
        match run_trial(&config, &settings, trial_seed(seed, trial)) {
            Ok(outcome) => trials.push(outcome),
            Err(err) => {
                warn!(job = index, trial, error = %err, "trial failed");
                report.status = JobStatus::Failed;
                report.error = Some(err.with_context("trial", trial.to_string()));
                return report;
            }
        }
    }
    debug!(job = index, trials = trials.len(), "job trials complete");
    report.summary = Some(JobSummary::from_trials(&trials, plan.seats));
    report
}

/// Loads a sweep plan from disk.
pub fn load_sweep_plan<P: AsRef<Path>>(path: P) -> Result<SweepPlan, VoteError> {
    load_yaml(path.as_ref())
}

/// Writes the report as canonical JSON into `out`, creating the directory.
pub fn write_sweep_report(report: &SweepReport, out: &Path) -> Result<PathBuf, VoteError> {
    write_canonical_json(report, out, SWEEP_REPORT_FILE)
}
