//! Canonical identifier types used across the decoder, the lock table and the scheduler.

use std::fmt;

/// Transaction identifier as written in the schedule (`R1(X)` belongs to transaction `1`).
pub type TxnId = u32;

/// Opaque resource identifier.
///
/// Resources are compared by name only; the simulator never interprets their content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a resource identifier from its textual name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the textual name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceId;
    use googletest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("X")]
    #[case("account_42")]
    fn resource_id_displays_its_name(#[case] name: &str) {
        let resource = ResourceId::from(name);
        let rendered = resource.to_string();
        assert_that!(rendered.as_str(), eq(name));
        assert_that!(resource.as_str(), eq(name));
    }

    #[rstest]
    fn resource_ids_order_by_name() {
        assert_that!(ResourceId::from("A") < ResourceId::from("B"), eq(true));
    }
}
