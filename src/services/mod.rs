//! Sound cue services
//!
//! This module turns engine notifications into cue events and plays them
//! through an external command.

pub mod cues;
pub mod sound;

// Re-export main types
pub use cues::{CueEvent, CueForwarder, CueSignal};
pub use sound::{CueSink, SoundPlayer};
