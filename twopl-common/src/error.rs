//! Shared error model for cross-crate APIs.

use thiserror::Error;

/// Unified result type used by all public interfaces in `twopl`.
pub type TplResult<T> = Result<T, TplError>;

/// Error categories surfaced by the decoder, the simulation core and the CLI.
///
/// Deadlock is deliberately absent: it is a regular simulation outcome, not a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TplError {
    /// Schedule text could not be decoded into operations.
    #[error("parse error at token {position} `{token}`: {reason}")]
    Parse {
        /// 1-based token position inside the schedule.
        position: usize,
        /// Offending token text.
        token: String,
        /// Human-readable reason.
        reason: &'static str,
    },

    /// Configuration is invalid for the requested operation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Simulation state does not allow this operation.
    ///
    /// Raised only for internal invariant violations; correct scheduling never produces it.
    #[error("invalid simulation state: {0}")]
    InvalidState(&'static str),

    /// Reading schedule input failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TplError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::TplError;
    use googletest::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn parse_error_message_names_position_and_token() {
        let error = TplError::Parse {
            position: 3,
            token: "X1(A)".to_owned(),
            reason: "unknown action",
        };
        let message = error.to_string();
        assert_that!(
            message.as_str(),
            eq("parse error at token 3 `X1(A)`: unknown action")
        );
    }

    #[rstest]
    fn io_errors_convert_into_io_variant() {
        let error = TplError::from(std::io::Error::other("boom"));
        assert_eq!(error, TplError::Io("boom".to_owned()));
    }
}
