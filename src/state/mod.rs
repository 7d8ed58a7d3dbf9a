//! State management module
//!
//! This module contains the timer registry, session handles and snapshots.

pub mod app_state;
pub mod error;
pub mod session;

// Re-export main types
pub use app_state::AppState;
pub use error::StateError;
pub use session::{SessionCommand, SessionHandle, TimerAction, TimerSnapshot};
