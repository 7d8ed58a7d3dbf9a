//! Phase and timer configuration

use serde::{Deserialize, Serialize};

use super::TimerError;

/// Upper bound on the number of phases in one cycle
pub const MAX_PHASES: usize = 1000;

/// One named stage of a timer cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDefinition {
    pub name: String,
    pub duration_seconds: u32,
    /// Remaining seconds at which a warning cue is emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_seconds: Option<u32>,
}

impl PhaseDefinition {
    /// Create a phase without a warning cue
    pub fn new(name: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            warning_seconds: None,
        }
    }

    /// Emit a warning cue when this many seconds are left in the phase
    pub fn with_warning(mut self, warning_seconds: u32) -> Self {
        self.warning_seconds = Some(warning_seconds);
        self
    }

    fn validate(&self) -> Result<(), TimerError> {
        if self.duration_seconds < 1 {
            return Err(TimerError::invalid(format!(
                "phase '{}' must last at least 1 second",
                self.name
            )));
        }

        if let Some(warning) = self.warning_seconds {
            if warning < 1 || warning >= self.duration_seconds {
                return Err(TimerError::invalid(format!(
                    "phase '{}' warning at {}s must be between 1 and {}s",
                    self.name,
                    warning,
                    self.duration_seconds - 1
                )));
            }
        }

        Ok(())
    }
}

/// Full description of a phase-sequencing timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    /// The cyclic portion, in order
    pub phases: Vec<PhaseDefinition>,
    pub cycle_count: u32,
    /// One-shot phase run before the first cycle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_in: Option<PhaseDefinition>,
}

impl TimerConfig {
    pub fn new(phases: Vec<PhaseDefinition>, cycle_count: u32) -> Self {
        Self {
            phases,
            cycle_count,
            lead_in: None,
        }
    }

    pub fn with_lead_in(mut self, lead_in: PhaseDefinition) -> Self {
        self.lead_in = Some(lead_in);
        self
    }

    /// Check every invariant the engine relies on
    pub fn validate(&self) -> Result<(), TimerError> {
        if self.phases.is_empty() {
            return Err(TimerError::invalid("at least one phase is required"));
        }
        if self.phases.len() > MAX_PHASES {
            return Err(TimerError::invalid(format!(
                "{} phases given, at most {} are allowed",
                self.phases.len(),
                MAX_PHASES
            )));
        }
        if self.cycle_count < 1 {
            return Err(TimerError::invalid("cycle count must be at least 1"));
        }

        if let Some(lead_in) = &self.lead_in {
            lead_in.validate()?;
        }
        for phase in &self.phases {
            phase.validate()?;
        }

        if self.checked_total_seconds().is_none() {
            return Err(TimerError::invalid("total running time is too long"));
        }

        Ok(())
    }

    /// Length of one pass through the cyclic phases
    pub fn cycle_seconds(&self) -> u64 {
        self.phases
            .iter()
            .fold(0u64, |sum, phase| sum.saturating_add(u64::from(phase.duration_seconds)))
    }

    /// Seconds from a fresh start to the terminal state, saturating at `u64::MAX`
    pub fn total_seconds(&self) -> u64 {
        self.checked_total_seconds().unwrap_or(u64::MAX)
    }

    fn checked_total_seconds(&self) -> Option<u64> {
        let lead_in = self
            .lead_in
            .as_ref()
            .map_or(0, |phase| u64::from(phase.duration_seconds));
        let cycle = self.phases.iter().try_fold(0u64, |sum, phase| {
            sum.checked_add(u64::from(phase.duration_seconds))
        })?;
        cycle
            .checked_mul(u64::from(self.cycle_count))?
            .checked_add(lead_in)
    }
}
