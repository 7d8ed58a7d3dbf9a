//! Errors surfaced by the timer registry

use thiserror::Error;

use crate::engine::TimerError;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    InvalidConfig(#[from] TimerError),

    #[error("timer {0} not found")]
    NotFound(u64),

    /// The driver task behind a timer is gone
    #[error("{0}")]
    Driver(String),

    #[error("failed to lock {0}")]
    Lock(&'static str),
}
