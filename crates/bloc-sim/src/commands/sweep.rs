use std::error::Error;
use std::path::PathBuf;

use bloc_core::SlateId;
use bloc_exp::serde::write_canonical_json;
use bloc_exp::{load_sweep_plan, sweep, write_sweep_report, SeatMatrix, SweepReport};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML sweep plan.
    #[arg(long)]
    pub plan: PathBuf,
    /// Master seed; job and trial seeds derive from it.
    #[arg(long)]
    pub seed: u64,
    /// Output directory for `sweep_report.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker threads, overriding the plan's scheduler.
    #[arg(long)]
    pub threads: Option<usize>,
    /// Also write `seat_matrix.json` for this slate (two-parameter grids only).
    #[arg(long)]
    pub matrix_slate: Option<String>,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let report = execute(args)?;
    let path = write_sweep_report(&report, &args.out)?;
    info!(path = %path.display(), "wrote sweep report");
    if let Some(slate) = &args.matrix_slate {
        let matrix = SeatMatrix::from_report(&report, &SlateId::new(slate.as_str()))?;
        let matrix_path = write_canonical_json(&matrix, &args.out, "seat_matrix.json")?;
        info!(path = %matrix_path.display(), "wrote seat matrix");
    }
    Ok(())
}

fn execute(args: &SweepArgs) -> Result<SweepReport, Box<dyn Error>> {
    let mut plan = load_sweep_plan(&args.plan)?;
    if let Some(threads) = args.threads {
        plan.scheduler.parallelism = threads;
    }
    Ok(sweep(&plan, args.seed)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const PLAN: &str = "\
ballots: 60
seats: 2
trials: 2
parameters:
  - name: a_to_b
    bloc: A
    slate: B
    values: [0.0, 0.4]
  - name: b_to_a
    bloc: B
    slate: A
    values: [0.1]
election:
  slates:
    A: [a1, a2]
    B: [b1, b2]
  blocs:
    A:
      proportion: 0.5
      cohesion: {A: 1.0, B: 0.0}
    B:
      proportion: 0.5
      cohesion: {A: 0.0, B: 1.0}
";

    #[test]
    fn threads_flag_and_matrix_output() {
        let temp = tempfile::tempdir().expect("tmp dir");
        let plan = temp.path().join("plan.yaml");
        fs::write(&plan, PLAN).expect("write plan");
        let out = temp.path().join("out");
        let args = SweepArgs {
            plan,
            seed: 12,
            out: out.clone(),
            threads: Some(2),
            matrix_slate: Some("B".to_string()),
        };

        let report = execute(&args).expect("sweep runs");
        assert_eq!(report.metrics.parallelism, 2);
        assert_eq!(report.metrics.completed, 2);

        run(&args).expect("command runs");
        assert!(out.join("sweep_report.json").exists());
        assert!(out.join("seat_matrix.json").exists());
    }
}
