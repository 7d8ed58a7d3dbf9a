//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod cue_player;
pub mod timer_driver;

// Re-export main functions
pub use cue_player::{cue_player_task, DEFAULT_ALARM_INTERVAL};
pub use timer_driver::{timer_driver_task, TICK_PERIOD};
