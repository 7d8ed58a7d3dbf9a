//! Phase-sequencing timer engine
//!
//! A single parameterized countdown state machine. Every workout-style timer
//! (Tabata, HIIT, interval, boxing, Pomodoro, plain countdown) is a distinct
//! [`TimerConfig`] driven by the same [`PhaseSequenceTimer`].

pub mod error;
pub mod notifier;
pub mod phase;
pub mod presets;
pub mod state;
pub mod timer;

// Re-export main types
pub use error::TimerError;
pub use notifier::{Cue, CueRecorder, Notifier, Silent};
pub use phase::{PhaseDefinition, TimerConfig, MAX_PHASES};
pub use presets::{HiitProtocol, Preset, HIIT_PROTOCOLS};
pub use state::TimerState;
pub use timer::PhaseSequenceTimer;
