//! `sluice`: run a decomposed 1D advection problem from a parameter file.
//!
//! ```text
//! sluice run.toml --procs 4 --set Driver.tmax=2.0 --set Hydro.f_cfl=0.5
//! ```
//!
//! Exits with status 0 once the final checkpoint is written, or prints
//! the error chain and exits non-zero.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sluice_engine::{run, Parameters, RunConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Decomposed 1D finite-volume advection solver.
#[derive(Parser, Debug)]
#[command(name = "sluice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decomposed 1D finite-volume advection solver", long_about = None)]
struct Cli {
    /// TOML parameter file.
    config: PathBuf,

    /// Number of processes (one thread each).
    #[arg(short = 'n', long, default_value_t = 1)]
    procs: u32,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Override a parameter, e.g. `--set Driver.tmax=2.0`. Repeatable.
    #[arg(short, long = "set", value_name = "SECTION.KEY=VALUE")]
    overrides: Vec<String>,
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .with_thread_names(cli.procs > 1)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut params = Parameters::from_file(&cli.config)?;
    for o in &cli.overrides {
        params.set_override(o)?;
    }
    let config = RunConfig::from_parameters(&params)
        .with_context(|| format!("invalid parameter file {}", cli.config.display()))?;

    let summary = run(&config, cli.procs).map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!("run failed ({kind})"))
    })?;
    tracing::info!(
        "done: {} after {} steps, t = {}, {} checkpoint(s)",
        summary.stop,
        summary.clock.n_step,
        summary.clock.time,
        summary.checkpoints.len()
    );
    Ok(())
}
