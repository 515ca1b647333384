//! Resource lock table with shared/exclusive compatibility.

use tracing::trace;
use twopl_common::error::{TplError, TplResult};
use twopl_common::ids::{ResourceId, TxnId};

use crate::containers::HotMap;
use crate::operation::LockMode;

/// One granted lock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEntry {
    /// Granted mode.
    pub mode: LockMode,
    /// Holding transaction.
    pub txid: TxnId,
}

/// Result of one lock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockGrant {
    /// The lock is now held (or was already held) by the requester.
    Granted,
    /// Another transaction holds a conflicting mode.
    Denied,
}

/// Authoritative map from resource to its granted `(mode, txid)` records.
///
/// Entries per resource keep grant order and hold at most one record per transaction. The table
/// never wakes blocked transactions: the scheduler re-evaluates them on every scan pass.
#[derive(Debug, Default)]
pub struct LockTable {
    entries: HotMap<ResourceId, Vec<LockEntry>>,
    /// Advisory waiting list, filled on denial and pruned on grant. Reporting only.
    waiters: HotMap<ResourceId, Vec<TxnId>>,
    track_waiters: bool,
}

impl LockTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(track_waiters: bool) -> Self {
        Self {
            entries: HotMap::new(),
            waiters: HotMap::new(),
            track_waiters,
        }
    }

    /// Requests `mode` on `resource` for `txid`.
    ///
    /// Denied iff another transaction holds the resource in a conflicting mode. A transaction
    /// that already holds the resource is granted again without changing its record.
    pub fn request_lock(&mut self, resource: &ResourceId, mode: LockMode, txid: TxnId) -> LockGrant {
        let holders = self.entries.entry(resource.clone()).or_default();
        if holders.iter().any(|entry| entry.txid == txid) {
            return LockGrant::Granted;
        }
        if holders
            .iter()
            .any(|entry| !entry.mode.is_compatible_with(mode))
        {
            trace!(txid, %resource, %mode, "lock request denied");
            if self.track_waiters {
                let queue = self.waiters.entry(resource.clone()).or_default();
                if !queue.contains(&txid) {
                    queue.push(txid);
                }
            }
            return LockGrant::Denied;
        }

        holders.push(LockEntry { mode, txid });
        if let Some(queue) = self.waiters.get_mut(resource) {
            queue.retain(|waiting| *waiting != txid);
            if queue.is_empty() {
                let _ = self.waiters.remove(resource);
            }
        }
        trace!(txid, %resource, %mode, "lock granted");
        LockGrant::Granted
    }

    /// Removes the record `txid` holds on `resource` and returns its mode.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidState` when `txid` holds no lock on `resource`.
    pub fn release(&mut self, resource: &ResourceId, txid: TxnId) -> TplResult<LockMode> {
        let Some(holders) = self.entries.get_mut(resource) else {
            return Err(TplError::InvalidState("release of a lock that is not held"));
        };
        let Some(position) = holders.iter().position(|entry| entry.txid == txid) else {
            return Err(TplError::InvalidState("release of a lock that is not held"));
        };
        let released = holders.remove(position);
        if holders.is_empty() {
            let _ = self.entries.remove(resource);
        }
        trace!(txid, %resource, mode = %released.mode, "lock released");
        Ok(released.mode)
    }

    /// Returns the granted records on `resource` in grant order.
    #[must_use]
    pub fn holders(&self, resource: &ResourceId) -> &[LockEntry] {
        self.entries.get(resource).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the mode `txid` holds on `resource`, if any.
    #[must_use]
    pub fn held_mode(&self, resource: &ResourceId, txid: TxnId) -> Option<LockMode> {
        self.holders(resource)
            .iter()
            .find(|entry| entry.txid == txid)
            .map(|entry| entry.mode)
    }

    /// Returns whether no lock is currently granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advisory waiting list sorted by resource name.
    #[must_use]
    pub fn waiters(&self) -> Vec<(ResourceId, Vec<TxnId>)> {
        let mut waiters = self
            .waiters
            .iter()
            .map(|(resource, queue)| (resource.clone(), queue.clone()))
            .collect::<Vec<_>>();
        waiters.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
        waiters
    }
}

#[cfg(test)]
mod tests {
    use super::{LockEntry, LockGrant, LockTable};
    use crate::operation::LockMode;
    use googletest::prelude::*;
    use rstest::rstest;
    use twopl_common::error::TplError;
    use twopl_common::ids::ResourceId;

    fn resource(name: &str) -> ResourceId {
        ResourceId::from(name)
    }

    #[rstest]
    fn readers_share_a_resource() {
        let mut table = LockTable::new(true);
        let x = resource("X");
        assert_that!(table.request_lock(&x, LockMode::Read, 1), eq(LockGrant::Granted));
        assert_that!(table.request_lock(&x, LockMode::Read, 2), eq(LockGrant::Granted));
        assert_that!(table.holders(&x).len(), eq(2_usize));
    }

    #[rstest]
    #[case(LockMode::Read, LockMode::Write)]
    #[case(LockMode::Write, LockMode::Read)]
    #[case(LockMode::Write, LockMode::Write)]
    fn conflicting_modes_are_denied(#[case] held: LockMode, #[case] requested: LockMode) {
        let mut table = LockTable::new(true);
        let x = resource("X");
        assert_that!(table.request_lock(&x, held, 1), eq(LockGrant::Granted));
        assert_that!(table.request_lock(&x, requested, 2), eq(LockGrant::Denied));
        assert_eq!(table.holders(&x), &[LockEntry { mode: held, txid: 1 }]);
    }

    #[rstest]
    fn re_request_by_holder_is_idempotent() {
        let mut table = LockTable::new(true);
        let x = resource("X");
        let _ = table.request_lock(&x, LockMode::Read, 1);
        let _ = table.request_lock(&x, LockMode::Read, 2);

        assert_that!(table.request_lock(&x, LockMode::Write, 1), eq(LockGrant::Granted));
        assert_that!(table.holders(&x).len(), eq(2_usize));
        assert_that!(table.held_mode(&x, 1), eq(Some(LockMode::Read)));
    }

    #[rstest]
    fn release_removes_only_the_requesters_record() {
        let mut table = LockTable::new(true);
        let x = resource("X");
        let _ = table.request_lock(&x, LockMode::Read, 1);
        let _ = table.request_lock(&x, LockMode::Read, 2);

        assert_eq!(table.release(&x, 1), Ok(LockMode::Read));
        assert_that!(table.held_mode(&x, 1), eq(None));
        assert_that!(table.held_mode(&x, 2), eq(Some(LockMode::Read)));

        assert_that!(table.release(&x, 2).is_ok(), eq(true));
        assert_that!(table.is_empty(), eq(true));
    }

    #[rstest]
    fn releasing_an_absent_lock_is_an_invariant_violation() {
        let mut table = LockTable::new(true);
        let x = resource("X");
        assert_eq!(
            table.release(&x, 7),
            Err(TplError::InvalidState("release of a lock that is not held"))
        );

        let _ = table.request_lock(&x, LockMode::Write, 1);
        assert_that!(table.release(&x, 2).is_err(), eq(true));
    }

    #[rstest]
    fn release_does_not_grant_anything_by_itself() {
        let mut table = LockTable::new(true);
        let x = resource("X");
        let _ = table.request_lock(&x, LockMode::Write, 1);
        assert_that!(table.request_lock(&x, LockMode::Write, 2), eq(LockGrant::Denied));

        let _ = table.release(&x, 1);
        assert_that!(table.held_mode(&x, 2), eq(None));
        assert_that!(table.request_lock(&x, LockMode::Write, 2), eq(LockGrant::Granted));
    }

    #[rstest]
    fn waiters_are_advisory_and_pruned_on_grant() {
        let mut table = LockTable::new(true);
        let x = resource("X");
        let _ = table.request_lock(&x, LockMode::Write, 1);
        let _ = table.request_lock(&x, LockMode::Read, 2);
        let _ = table.request_lock(&x, LockMode::Read, 2);
        let _ = table.request_lock(&x, LockMode::Read, 3);
        assert_eq!(table.waiters(), vec![(x.clone(), vec![2, 3])]);

        let _ = table.release(&x, 1);
        assert_eq!(table.waiters(), vec![(x.clone(), vec![2, 3])]);

        let _ = table.request_lock(&x, LockMode::Read, 2);
        assert_eq!(table.waiters(), vec![(x.clone(), vec![3])]);
        let _ = table.request_lock(&x, LockMode::Read, 3);
        assert_that!(table.waiters().is_empty(), eq(true));
    }

    #[rstest]
    fn waiters_are_not_recorded_when_tracking_is_off() {
        let mut table = LockTable::new(false);
        let x = resource("X");
        let _ = table.request_lock(&x, LockMode::Write, 1);
        let _ = table.request_lock(&x, LockMode::Write, 2);
        assert_that!(table.waiters().is_empty(), eq(true));
    }
}
