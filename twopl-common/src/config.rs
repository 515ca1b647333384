//! Simulation configuration shared by the core and the CLI.

use crate::error::{TplError, TplResult};

/// Runtime knobs for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Whether the lock table keeps the advisory per-resource waiting list.
    ///
    /// The list only feeds reports. Blocked transactions are re-evaluated on every scan pass,
    /// so it never decides who is unblocked.
    pub track_waiters: bool,
    /// Optional upper bound on scan passes. `None` means unbounded.
    pub max_passes: Option<usize>,
    /// Token separator used when rendering the trace.
    pub separator: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            track_waiters: true,
            max_passes: None,
            separator: " ".to_owned(),
        }
    }
}

impl SimulationConfig {
    /// Checks the configuration for values the simulator cannot honor.
    ///
    /// # Errors
    ///
    /// Returns `TplError::InvalidConfig` when the pass bound is zero or the separator is empty.
    pub fn validate(&self) -> TplResult<()> {
        if self.max_passes == Some(0) {
            return Err(TplError::InvalidConfig("max passes must be positive"));
        }
        if self.separator.is_empty() {
            return Err(TplError::InvalidConfig("trace separator must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SimulationConfig;
    use crate::error::TplError;
    use googletest::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn default_config_is_valid() {
        assert_that!(SimulationConfig::default().validate().is_ok(), eq(true));
    }

    #[rstest]
    fn zero_pass_bound_is_rejected() {
        let config = SimulationConfig {
            max_passes: Some(0),
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(TplError::InvalidConfig("max passes must be positive"))
        );
    }

    #[rstest]
    fn empty_separator_is_rejected() {
        let config = SimulationConfig {
            separator: String::new(),
            ..SimulationConfig::default()
        };
        assert_that!(config.validate().is_err(), eq(true));
    }
}
