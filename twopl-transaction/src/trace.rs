//! Ordered trace of scheduling decisions.

use std::fmt;

use twopl_common::error::{TplError, TplResult};
use twopl_common::ids::{ResourceId, TxnId};

use crate::operation::{LockMode, Operation};

/// Literal text of the terminal deadlock event.
pub const DEADLOCK_TOKEN: &str = "deadlock occurs";

/// One recorded scheduling decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// `<m>l<tid>(<resource>)`.
    LockGranted {
        /// Granted mode.
        mode: LockMode,
        /// Requesting transaction.
        txid: TxnId,
        /// Locked resource.
        resource: ResourceId,
    },
    /// `<Action><tid>(<resource>)`.
    Executed(Operation),
    /// `ul<tid>(<resource>)`.
    LockReleased {
        /// Releasing transaction.
        txid: TxnId,
        /// Released resource.
        resource: ResourceId,
    },
    /// `deadlock occurs`, always last.
    Deadlock,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockGranted {
                mode,
                txid,
                resource,
            } => write!(f, "{mode}l{txid}({resource})"),
            Self::Executed(operation) => write!(f, "{operation}"),
            Self::LockReleased { txid, resource } => write!(f, "ul{txid}({resource})"),
            Self::Deadlock => f.write_str(DEADLOCK_TOKEN),
        }
    }
}

/// How a simulation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every operation executed.
    Completed,
    /// A full scan found no runnable operation.
    Deadlock,
}

/// Append-only event log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    /// Creates an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends one event.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when the trace already ended with a deadlock.
    pub fn record(&mut self, event: TraceEvent) -> TplResult<()> {
        if self.outcome() == Outcome::Deadlock {
            return Err(TplError::InvalidState("trace already terminated by deadlock"));
        }
        self.events.push(event);
        Ok(())
    }

    /// All events in append order.
    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// `Deadlock` when the last event is the deadlock marker, else `Completed`.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.events.last() {
            Some(TraceEvent::Deadlock) => Outcome::Deadlock,
            _ => Outcome::Completed,
        }
    }
}
