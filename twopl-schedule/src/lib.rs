//! Text boundary of the simulator: schedule decoding and trace encoding.

pub mod decode;
pub mod encode;


use twopl_common::config::SimulationConfig;
use twopl_common::error::TplResult;
use twopl_transaction::report::SimulationReport;
use twopl_transaction::simulate;

/// Rendered result of one schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRun {
    /// Trace line, events joined with the configured separator.
    pub trace: String,
    /// Full simulation report.
    pub report: SimulationReport,
}

/// Decodes `schedule`, simulates it and renders the trace.
///
/// # Errors
///
/// Returns `TplError::Parse` for malformed schedule text and propagates configuration or
/// internal errors from the simulator.
pub fn run_schedule(schedule: &str, config: &SimulationConfig) -> TplResult<ScheduleRun> {
    let operations = decode::parse_schedule(schedule)?;
    let report = simulate(&operations, config)?;
    Ok(ScheduleRun {
        trace: encode::encode_trace(&report.trace, &config.separator),
        report,
    })
}
