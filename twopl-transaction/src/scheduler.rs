//! Deterministic scan scheduler.
//!
//! The scheduler owns the lock table, every transaction and the trace. It keeps one shared
//! sequence of not-yet-executed operations in submission order and repeatedly scans it from the
//! start:
//! 1. Transactions already refused a lock during the current pass are skipped.
//! 2. An operation whose resource is already held executes right away.
//! 3. Otherwise the lock is requested in the mode the transaction needs. A grant that completes
//!    the footprint only runs the release sweep; the operation itself executes on a later pass.
//! 4. A pass that reaches the end without progress ends the run with a deadlock.
//!
//! Blocked flags are cleared at the start of every pass, so lock releases never have to wake
//! anyone up.

use tracing::{debug, info, trace, warn};
use twopl_common::config::SimulationConfig;
use twopl_common::error::{TplError, TplResult};
use twopl_common::ids::TxnId;

use crate::containers::HotMap;
use crate::lock_table::{LockGrant, LockTable};
use crate::operation::Operation;
use crate::report::SimulationReport;
use crate::trace::{Outcome, Trace, TraceEvent};
use crate::transaction::Transaction;

/// Result of one scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassOutcome {
    /// Something was granted, executed or released; scan again from the start.
    Progressed,
    /// No runnable operation exists.
    Stalled,
}

/// Single-threaded two-phase locking simulator for one schedule.
#[derive(Debug)]
pub struct Scheduler {
    config: SimulationConfig,
    lock_table: LockTable,
    /// Transactions in order of first appearance.
    transactions: Vec<Transaction>,
    slots: HotMap<TxnId, usize>,
    /// Shared sequence of not-yet-executed operations, in submission order.
    pending: Vec<Operation>,
    trace: Trace,
    passes: usize,
}

impl Scheduler {
    /// Builds the simulation state for a decoded schedule.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidConfig` when `config` fails validation.
    pub fn new(operations: Vec<Operation>, config: SimulationConfig) -> TplResult<Self> {
        config.validate()?;

        let mut slots = HotMap::<TxnId, usize>::new();
        let mut grouped = Vec::<(TxnId, Vec<Operation>)>::new();
        for operation in &operations {
            let slot = *slots.entry(operation.txid).or_insert_with(|| {
                grouped.push((operation.txid, Vec::new()));
                grouped.len() - 1
            });
            grouped[slot].1.push(operation.clone());
        }
        let transactions = grouped
            .into_iter()
            .map(|(txid, ops)| Transaction::new(txid, ops))
            .collect::<TplResult<Vec<_>>>()?;

        Ok(Self {
            lock_table: LockTable::new(config.track_waiters),
            config,
            transactions,
            slots,
            pending: operations,
            trace: Trace::new(),
            passes: 0,
        })
    }

    /// Runs passes until the shared sequence is empty or a pass stalls.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when the configured pass bound is exceeded or an internal
    /// invariant breaks.
    pub fn run(mut self) -> TplResult<SimulationReport> {
        while !self.pending.is_empty() {
            if self
                .config
                .max_passes
                .is_some_and(|limit| self.passes >= limit)
            {
                return Err(TplError::InvalidState("scan pass bound exceeded"));
            }
            self.passes += 1;
            if self.run_pass()? == PassOutcome::Stalled {
                warn!(
                    passes = self.passes,
                    pending = self.pending.len(),
                    "no runnable operation left, deadlock"
                );
                self.trace.record(TraceEvent::Deadlock)?;
                break;
            }
        }

        if self.trace.outcome() == Outcome::Completed {
            if self.transactions.iter().any(|txn| !txn.is_done()) {
                return Err(TplError::InvalidState("completed run left operations behind"));
            }
            if !self.lock_table.is_empty() {
                return Err(TplError::InvalidState("completed run left locks behind"));
            }
        }
        info!(
            passes = self.passes,
            events = self.trace.len(),
            outcome = ?self.trace.outcome(),
            "simulation finished"
        );
        Ok(self.into_report())
    }

    fn run_pass(&mut self) -> TplResult<PassOutcome> {
        for txn in &mut self.transactions {
            txn.clear_blocked();
        }

        for position in 0..self.pending.len() {
            let slot = self.slot_of(self.pending[position].txid)?;
            if self.transactions[slot].is_blocked() {
                continue;
            }
            let resource = self.pending[position].resource.clone();
            if self.transactions[slot].holds(&resource) {
                self.execute_next(position, slot)?;
                return Ok(PassOutcome::Progressed);
            }

            let txn = &self.transactions[slot];
            let txid = txn.id();
            let mode = txn.required_mode(&resource);
            match self.lock_table.request_lock(&resource, mode, txid) {
                LockGrant::Granted => {
                    self.trace.record(TraceEvent::LockGranted {
                        mode,
                        txid,
                        resource: resource.clone(),
                    })?;
                    if self.transactions[slot].record_acquired(&resource)? {
                        debug!(txid, %resource, "footprint complete, entering shrinking phase");
                        self.release_sweep(slot)?;
                    } else {
                        self.execute_next(position, slot)?;
                    }
                    return Ok(PassOutcome::Progressed);
                }
                LockGrant::Denied => {
                    trace!(txid, %resource, %mode, position, "transaction blocked for this pass");
                    self.transactions[slot].mark_blocked();
                }
            }
        }
        Ok(PassOutcome::Stalled)
    }

    /// Executes the pending operation at `position` for the transaction in `slot`, then runs the
    /// eligibility sweep.
    fn execute_next(&mut self, position: usize, slot: usize) -> TplResult<()> {
        let operation = self.pending.remove(position);
        self.transactions[slot].execute_next(&operation)?;
        trace!(operation = %operation, "executed");
        self.trace.record(TraceEvent::Executed(operation))?;
        self.release_sweep(slot)
    }

    /// Releases every held resource the transaction no longer references.
    fn release_sweep(&mut self, slot: usize) -> TplResult<()> {
        let txn = &mut self.transactions[slot];
        let txid = txn.id();
        for resource in txn.releasable() {
            let _ = self.lock_table.release(&resource, txid)?;
            txn.record_released(&resource)?;
            debug!(txid, %resource, "early release");
            self.trace.record(TraceEvent::LockReleased { txid, resource })?;
        }
        Ok(())
    }

    fn slot_of(&self, txid: TxnId) -> TplResult<usize> {
        self.slots
            .get(&txid)
            .copied()
            .ok_or(TplError::InvalidState("operation of an unknown transaction"))
    }

    fn into_report(self) -> SimulationReport {
        SimulationReport {
            waiters: self.lock_table.waiters(),
            transactions: self
                .transactions
                .iter()
                .map(Transaction::snapshot)
                .collect(),
            trace: self.trace,
            passes: self.passes,
        }
    }
}

/// Simulates `operations` under two-phase locking.
///
/// # Errors
///
/// Propagates configuration and internal invariant errors from [`Scheduler`].
pub fn simulate(operations: &[Operation], config: &SimulationConfig) -> TplResult<SimulationReport> {
    Scheduler::new(operations.to_vec(), config.clone())?.run()
}
