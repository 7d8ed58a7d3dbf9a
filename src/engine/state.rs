//! Runtime timer state

use serde::{Deserialize, Serialize};

use super::TimerConfig;

/// Mutable position of a timer within its phase sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Index into the cyclic phases; 0 while in the lead-in
    pub phase_index: usize,
    /// 1-based current cycle
    pub cycle_index: u32,
    pub remaining_seconds: u32,
    pub running: bool,
    pub terminal: bool,
    /// True while the one-shot lead-in phase is current
    pub in_lead_in: bool,
}

impl TimerState {
    /// State of a freshly constructed timer for `config`
    pub fn initial(config: &TimerConfig) -> Self {
        let (in_lead_in, remaining_seconds) = match &config.lead_in {
            Some(lead_in) => (true, lead_in.duration_seconds),
            None => (
                false,
                config.phases.first().map_or(0, |phase| phase.duration_seconds),
            ),
        };

        Self {
            phase_index: 0,
            cycle_index: 1,
            remaining_seconds,
            running: false,
            terminal: false,
            in_lead_in,
        }
    }

    /// Check if the tick source should currently be advancing this timer
    pub fn is_advancing(&self) -> bool {
        self.running && !self.terminal
    }
}
