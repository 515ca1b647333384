//! Two-phase locking simulation core.
//!
//! The crate owns everything between a decoded schedule and the emitted trace: the lock table,
//! the per-transaction phase machine, the scan scheduler and the trace model. Text decoding and
//! encoding live in `twopl-schedule`.

pub mod containers;
pub mod lock_table;
pub mod operation;
pub mod report;
pub mod scheduler;
pub mod trace;
pub mod transaction;

pub use scheduler::{Scheduler, simulate};
