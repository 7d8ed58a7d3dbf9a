//! Engine error types

use thiserror::Error;

/// Errors raised by the timer engine.
///
/// Construction is the only fallible step; every runtime operation on a
/// valid timer is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The supplied configuration violates one of its invariants.
    #[error("invalid timer config: {0}")]
    InvalidConfig(String),
}

impl TimerError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}
