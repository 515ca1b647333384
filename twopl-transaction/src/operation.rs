//! Schedule operation model.

use std::fmt;

use twopl_common::ids::{ResourceId, TxnId};

/// Data access performed by one schedule step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `R<tid>(<resource>)`.
    Read,
    /// `W<tid>(<resource>)`.
    Write,
}

impl Action {
    /// Schedule letter for this action.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }

    /// Parses a schedule letter. Only uppercase `R` and `W` are accepted.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'R' => Some(Self::Read),
            'W' => Some(Self::Write),
            _ => None,
        }
    }
}

/// Lock mode held on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Shared lock, compatible with other `Read` holders.
    Read,
    /// Exclusive lock.
    Write,
}

impl LockMode {
    /// Returns whether two holders with these modes may share one resource.
    #[must_use]
    pub const fn is_compatible_with(self, other: Self) -> bool {
        matches!((self, other), (Self::Read, Self::Read))
    }

    /// Lowercase trace prefix (`r` or `w`).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One step of the schedule: `(action, transaction id, resource)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    /// Read or write.
    pub action: Action,
    /// Owning transaction.
    pub txid: TxnId,
    /// Accessed resource.
    pub resource: ResourceId,
}

impl Operation {
    /// Creates an operation.
    #[must_use]
    pub fn new(action: Action, txid: TxnId, resource: impl Into<ResourceId>) -> Self {
        Self {
            action,
            txid,
            resource: resource.into(),
        }
    }

    /// Shorthand for a read step.
    #[must_use]
    pub fn read(txid: TxnId, resource: impl Into<ResourceId>) -> Self {
        Self::new(Action::Read, txid, resource)
    }

    /// Shorthand for a write step.
    #[must_use]
    pub fn write(txid: TxnId, resource: impl Into<ResourceId>) -> Self {
        Self::new(Action::Write, txid, resource)
    }
}

/// Renders the operation exactly as its schedule token, e.g. `W2(Y)`.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}({})",
            self.action.letter(),
            self.txid,
            self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, LockMode, Operation};
    use googletest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(LockMode::Read, LockMode::Read, true)]
    #[case(LockMode::Read, LockMode::Write, false)]
    #[case(LockMode::Write, LockMode::Read, false)]
    #[case(LockMode::Write, LockMode::Write, false)]
    fn only_read_pairs_are_compatible(
        #[case] left: LockMode,
        #[case] right: LockMode,
        #[case] expected: bool,
    ) {
        assert_that!(left.is_compatible_with(right), eq(expected));
    }

    #[rstest]
    #[case('R', Some(Action::Read))]
    #[case('W', Some(Action::Write))]
    #[case('r', None)]
    #[case('X', None)]
    fn action_letters_are_case_sensitive(#[case] letter: char, #[case] expected: Option<Action>) {
        assert_that!(Action::from_letter(letter), eq(expected));
    }

    #[rstest]
    fn operation_displays_as_schedule_token() {
        let write = Operation::write(12, "acct").to_string();
        let read = Operation::read(1, "X").to_string();
        assert_that!(write.as_str(), eq("W12(acct)"));
        assert_that!(read.as_str(), eq("R1(X)"));
    }
}
