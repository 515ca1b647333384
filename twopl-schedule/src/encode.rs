//! Trace and report rendering.

use std::fmt::Write as _;

use twopl_transaction::report::SimulationReport;
use twopl_transaction::trace::{Trace, TraceEvent};
use twopl_transaction::transaction::Phase;

/// Renders one event in its trace literal form.
#[must_use]
pub fn encode_event(event: &TraceEvent) -> String {
    event.to_string()
}

/// Renders a whole trace, events joined by `separator`.
#[must_use]
pub fn encode_trace(trace: &Trace, separator: &str) -> String {
    trace
        .events()
        .iter()
        .map(encode_event)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Renders the per-transaction inspection report printed by `twopl --report`.
#[must_use]
pub fn encode_report(report: &SimulationReport) -> String {
    let mut output = String::new();
    for txn in &report.transactions {
        let phase = match txn.phase {
            Phase::Growing => "growing",
            Phase::Shrinking => "shrinking",
        };
        let _ = writeln!(
            output,
            "transaction {}: phase={phase} blocked={}",
            txn.txid, txn.blocked
        );
        let _ = writeln!(output, "  held: {}", join_display(&txn.held));
        let _ = writeln!(output, "  footprint: {}", join_display(&txn.footprint));
        let _ = writeln!(output, "  remaining: {}", join_display(&txn.remaining));
        let _ = writeln!(output, "  history: {}", join_display(&txn.history));
    }
    for (resource, txids) in &report.waiters {
        let _ = writeln!(output, "waiting on {resource}: {}", join_display(txids));
    }
    let _ = write!(output, "passes: {}", report.passes);
    output
}

fn join_display<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "-".to_owned();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
