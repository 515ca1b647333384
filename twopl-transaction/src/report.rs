//! Post-run inspection views.

use twopl_common::ids::{ResourceId, TxnId};

use crate::operation::Operation;
use crate::trace::{Outcome, Trace};
use crate::transaction::Phase;

/// Frozen state of one transaction at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSnapshot {
    /// Transaction id.
    pub txid: TxnId,
    /// Final phase.
    pub phase: Phase,
    /// Whether the last scan pass found it blocked.
    pub blocked: bool,
    /// Resources still held, in acquisition order.
    pub held: Vec<ResourceId>,
    /// Full footprint, in first-reference order.
    pub footprint: Vec<ResourceId>,
    /// Operations that never executed.
    pub remaining: Vec<Operation>,
    /// Executed operations in execution order.
    pub history: Vec<Operation>,
}

/// Everything one simulation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// Ordered event log.
    pub trace: Trace,
    /// Transactions in order of first appearance in the schedule.
    pub transactions: Vec<TransactionSnapshot>,
    /// Advisory waiting list, sorted by resource. Empty when waiter tracking is off.
    pub waiters: Vec<(ResourceId, Vec<TxnId>)>,
    /// Number of scan passes performed.
    pub passes: usize,
}

impl SimulationReport {
    /// Shorthand for `self.trace.outcome()`.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.trace.outcome()
    }
}
