use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    demo::{self, DemoArgs},
    elect::{self, ElectArgs},
    sweep::{self, SweepArgs},
    tabulate::{self, TabulateArgs},
};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "bloc-sim", about = "Bloc cohesion STV election simulator")]
struct Cli {
    /// Log at debug level (per-round STV events).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate ballots for one election file and count them.
    Elect(ElectArgs),
    /// Count a hand-written ballot profile.
    Tabulate(TabulateArgs),
    /// Run a cohesion grid sweep.
    Sweep(SweepArgs),
    /// Run the built-in three-slate election.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result: Result<(), Box<dyn Error>> = match cli.command {
        Command::Elect(args) => elect::run(&args),
        Command::Tabulate(args) => tabulate::run(&args),
        Command::Sweep(args) => sweep::run(&args),
        Command::Demo(args) => demo::run(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}
