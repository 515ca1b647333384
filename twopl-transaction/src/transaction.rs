//! Per-transaction two-phase locking state machine.
//!
//! A transaction starts in `Growing`, acquires locks one resource at a time, and switches to
//! `Shrinking` the instant it holds its whole footprint. From then on it never acquires again
//! and gives up every held resource its remaining operations no longer reference.

use std::collections::VecDeque;

use twopl_common::error::{TplError, TplResult};
use twopl_common::ids::{ResourceId, TxnId};

use crate::operation::{Action, LockMode, Operation};
use crate::report::TransactionSnapshot;

/// Two-phase locking phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still acquiring locks.
    Growing,
    /// Footprint fully acquired; releases only from here on.
    Shrinking,
}

/// State of one simulated transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TxnId,
    remaining: VecDeque<Operation>,
    /// Held resources in acquisition order.
    held: Vec<ResourceId>,
    /// Every resource the transaction references, in first-reference order.
    footprint: Vec<ResourceId>,
    history: Vec<Operation>,
    phase: Phase,
    blocked: bool,
}

impl Transaction {
    /// Creates a transaction from its operations in schedule order.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when an operation belongs to another transaction.
    pub fn new(id: TxnId, operations: Vec<Operation>) -> TplResult<Self> {
        let mut footprint = Vec::new();
        for operation in &operations {
            if operation.txid != id {
                return Err(TplError::InvalidState(
                    "operation assigned to a foreign transaction",
                ));
            }
            if !footprint.contains(&operation.resource) {
                footprint.push(operation.resource.clone());
            }
        }
        Ok(Self {
            id,
            remaining: operations.into(),
            held: Vec::new(),
            footprint,
            history: Vec::new(),
            phase: Phase::Growing,
            blocked: false,
        })
    }

    /// Transaction id.
    #[must_use]
    pub fn id(&self) -> TxnId {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns whether the scheduler skipped this transaction during the current pass.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Marks the transaction blocked for the rest of the current scan pass.
    pub fn mark_blocked(&mut self) {
        self.blocked = true;
    }

    /// Makes the transaction eligible for the next scan pass again.
    pub fn clear_blocked(&mut self) {
        self.blocked = false;
    }

    /// Returns whether every operation has executed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Returns whether the transaction currently holds a lock on `resource`.
    #[must_use]
    pub fn holds(&self, resource: &ResourceId) -> bool {
        self.held.contains(resource)
    }

    /// Lock mode this transaction needs on `resource` right now.
    ///
    /// `Write` when any not-yet-executed operation writes the resource, else `Read`. The answer
    /// is re-derived from the remaining queue on every call.
    #[must_use]
    pub fn required_mode(&self, resource: &ResourceId) -> LockMode {
        let writes_later = self
            .remaining
            .iter()
            .any(|operation| operation.action == Action::Write && operation.resource == *resource);
        if writes_later {
            LockMode::Write
        } else {
            LockMode::Read
        }
    }

    /// Records a granted lock on `resource`.
    ///
    /// Returns `true` when this acquisition completed the footprint and moved the transaction to
    /// `Shrinking`. The transition fires once.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when the transaction is already shrinking, already holds
    /// the resource, or the resource lies outside its footprint.
    pub fn record_acquired(&mut self, resource: &ResourceId) -> TplResult<bool> {
        if self.phase == Phase::Shrinking {
            return Err(TplError::InvalidState(
                "shrinking transaction cannot acquire locks",
            ));
        }
        if !self.footprint.contains(resource) {
            return Err(TplError::InvalidState(
                "lock acquired outside transaction footprint",
            ));
        }
        if self.holds(resource) {
            return Err(TplError::InvalidState("lock acquired twice"));
        }
        self.held.push(resource.clone());
        if self.held.len() == self.footprint.len() {
            self.phase = Phase::Shrinking;
            return Ok(true);
        }
        Ok(false)
    }

    /// Held resources no remaining operation references, in acquisition order.
    ///
    /// Always empty while growing.
    #[must_use]
    pub fn releasable(&self) -> Vec<ResourceId> {
        if self.phase == Phase::Growing {
            return Vec::new();
        }
        self.held
            .iter()
            .filter(|resource| {
                !self
                    .remaining
                    .iter()
                    .any(|operation| operation.resource == **resource)
            })
            .cloned()
            .collect()
    }

    /// Forgets the lock on `resource` after the lock table dropped it.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when the resource is not held or is still referenced.
    pub fn record_released(&mut self, resource: &ResourceId) -> TplResult<()> {
        let Some(position) = self.held.iter().position(|held| held == resource) else {
            return Err(TplError::InvalidState("release of a lock that is not held"));
        };
        if self
            .remaining
            .iter()
            .any(|operation| operation.resource == *resource)
        {
            return Err(TplError::InvalidState(
                "release of a lock still needed by the transaction",
            ));
        }
        let _ = self.held.remove(position);
        Ok(())
    }

    /// Executes the next queued operation, which must equal `operation`.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when `operation` is not next in the queue or its resource
    /// is not held.
    pub fn execute_next(&mut self, operation: &Operation) -> TplResult<()> {
        if self.remaining.front() != Some(operation) {
            return Err(TplError::InvalidState(
                "operation executed out of transaction order",
            ));
        }
        if !self.holds(&operation.resource) {
            return Err(TplError::InvalidState(
                "operation executed without holding its lock",
            ));
        }
        if let Some(executed) = self.remaining.pop_front() {
            self.history.push(executed);
        }
        Ok(())
    }

    /// Captures an immutable view for reports.
    #[must_use]
    pub fn snapshot(&self) -> TransactionSnapshot {
        TransactionSnapshot {
            txid: self.id,
            phase: self.phase,
            blocked: self.blocked,
            held: self.held.clone(),
            footprint: self.footprint.clone(),
            remaining: self.remaining.iter().cloned().collect(),
            history: self.history.clone(),
        }
    }
}
