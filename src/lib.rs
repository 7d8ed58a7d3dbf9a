//! Phase Timer - workout timers driven by a single phase-sequencing engine
//!
//! The [`engine`] module holds the countdown state machine and its presets.
//! The remaining modules host engine instances behind an HTTP API, tick them
//! once per second and turn their notifications into sound cues.

pub mod config;
pub mod engine;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{PhaseDefinition, PhaseSequenceTimer, TimerConfig, TimerError, TimerState};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
