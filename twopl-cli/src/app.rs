//! Process composition root for `twopl`.

pub(crate) mod bootstrap;

#[cfg(test)]
mod app_tests;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use twopl_common::config::SimulationConfig;
use twopl_common::error::TplResult;
use twopl_schedule::encode::encode_report;
use twopl_schedule::run_schedule;

/// Command-line arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "twopl")]
#[command(about = "Deterministic two-phase locking schedule simulator")]
#[command(version)]
pub(crate) struct CliArgs {
    /// Schedule to simulate, e.g. "R1(X) W2(X)". Stdin is read when neither this nor --file is
    /// given.
    #[arg(conflicts_with = "file")]
    pub(crate) schedule: Option<String>,

    /// File with one schedule per line; blank lines and `#` comments are skipped
    #[arg(short, long)]
    pub(crate) file: Option<PathBuf>,

    /// Print per-transaction state and waiting lists after each trace
    #[arg(long)]
    pub(crate) report: bool,

    /// Do not keep the advisory waiting list
    #[arg(long)]
    pub(crate) no_waiters: bool,

    /// Abort a run after this many scan passes
    #[arg(long)]
    pub(crate) max_passes: Option<usize>,

    /// Separator placed between trace events
    #[arg(long, default_value = " ")]
    pub(crate) separator: String,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

/// Runs schedules with one fixed configuration.
#[derive(Debug, Clone)]
pub(crate) struct SimulatorApp {
    config: SimulationConfig,
    with_report: bool,
}

impl SimulatorApp {
    /// Creates the app from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidConfig` when `config` is not usable.
    pub(crate) fn new(config: SimulationConfig, with_report: bool) -> TplResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            with_report,
        })
    }

    /// Simulates one schedule and renders the output block for it.
    ///
    /// # Errors
    ///
    /// Returns decode errors and internal simulator errors.
    pub(crate) fn execute(&self, schedule: &str) -> TplResult<String> {
        let run = run_schedule(schedule, &self.config)?;
        if !self.with_report {
            return Ok(run.trace);
        }
        Ok(format!("{}\n{}", run.trace, encode_report(&run.report)))
    }
}

/// Runs every schedule from the selected source.
///
/// Returns `Ok(false)` when at least one schedule was rejected; each rejection is reported on
/// stderr with its line number and the remaining schedules still run.
///
/// # Errors
///
/// Returns configuration and input errors that prevent any schedule from running.
pub(crate) fn run(args: &CliArgs) -> TplResult<bool> {
    let app = SimulatorApp::new(bootstrap::config_from_args(args), args.report)?;
    let schedules = bootstrap::source_from_args(args).load()?;
    info!(count = schedules.len(), "loaded schedules");

    let mut stdout = io::stdout().lock();
    let mut all_succeeded = true;
    for schedule in &schedules {
        match app.execute(&schedule.text) {
            Ok(output) => writeln!(stdout, "{output}")?,
            Err(err) => {
                all_succeeded = false;
                error!(line = schedule.line, %err, "schedule rejected");
                eprintln!("line {}: {err}", schedule.line);
            }
        }
    }
    stdout.flush()?;
    Ok(all_succeeded)
}
