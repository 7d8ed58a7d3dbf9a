//! The phase-sequencing countdown engine

use tracing::debug;

use super::{Notifier, PhaseDefinition, TimerConfig, TimerError, TimerState};

/// Countdown engine that walks a [`TimerState`] through the phases of a
/// [`TimerConfig`], one tick per second, reporting transitions to `N`.
///
/// The engine never waits: ticks are delivered by an external once-per-second
/// driver and every operation completes synchronously.
#[derive(Debug)]
pub struct PhaseSequenceTimer<N> {
    config: TimerConfig,
    state: TimerState,
    notifier: N,
}

impl<N: Notifier> PhaseSequenceTimer<N> {
    /// Build a timer positioned at the start of its first phase, paused
    pub fn new(config: TimerConfig, notifier: N) -> Result<Self, TimerError> {
        config.validate()?;
        let state = TimerState::initial(&config);

        Ok(Self {
            config,
            state,
            notifier,
        })
    }

    /// Begin or resume counting down. Has no effect once terminal.
    pub fn start(&mut self) -> TimerState {
        if !self.state.terminal {
            self.state.running = true;
        }
        self.state
    }

    pub fn pause(&mut self) -> TimerState {
        self.state.running = false;
        self.state
    }

    /// Return to the freshly constructed state, paused
    pub fn reset(&mut self) -> TimerState {
        self.state = TimerState::initial(&self.config);
        self.state
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TimerState {
        if !self.state.is_advancing() {
            return self.state;
        }

        if self.state.remaining_seconds > 1 {
            self.state.remaining_seconds -= 1;

            let phase = phase_at(&self.config, &self.state);
            if phase.warning_seconds == Some(self.state.remaining_seconds) {
                self.notifier
                    .phase_warning(&phase.name, self.state.remaining_seconds);
            }
            return self.state;
        }

        self.complete_phase();
        self.state
    }

    fn complete_phase(&mut self) {
        let elapsed = phase_at(&self.config, &self.state);
        debug!(
            "Phase '{}' complete (cycle {}/{})",
            elapsed.name, self.state.cycle_index, self.config.cycle_count
        );
        self.notifier.phase_complete(&elapsed.name);

        if self.state.in_lead_in {
            self.state.in_lead_in = false;
            self.state.phase_index = 0;
            self.state.remaining_seconds = self.config.phases[0].duration_seconds;
            return;
        }

        let next = self.state.phase_index + 1;
        if next >= self.config.phases.len() {
            self.state.phase_index = 0;
            self.state.cycle_index += 1;
        } else {
            self.state.phase_index = next;
        }

        if self.state.cycle_index > self.config.cycle_count {
            self.state.terminal = true;
            self.state.running = false;
            self.state.remaining_seconds = 0;
            debug!("All {} cycles complete", self.config.cycle_count);
            self.notifier.finished();
            return;
        }

        self.state.remaining_seconds = self.config.phases[self.state.phase_index].duration_seconds;
    }

    pub fn is_terminal(&self) -> bool {
        self.state.terminal
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Copy of the current state
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// The phase currently counting down (the first cyclic phase once terminal)
    pub fn current_phase(&self) -> &PhaseDefinition {
        phase_at(&self.config, &self.state)
    }

    /// Percentage of the current phase already elapsed
    pub fn phase_progress(&self) -> f64 {
        if self.state.terminal {
            return 100.0;
        }

        let total = f64::from(self.current_phase().duration_seconds);
        let elapsed = total - f64::from(self.state.remaining_seconds);
        elapsed / total * 100.0
    }

    /// Seconds left until the terminal state, assuming uninterrupted ticking
    pub fn total_remaining_seconds(&self) -> u64 {
        if self.state.terminal {
            return 0;
        }

        let remaining = u64::from(self.state.remaining_seconds);
        let cycle = self.config.cycle_seconds();
        let cycles = u64::from(self.config.cycle_count);

        if self.state.in_lead_in {
            return remaining.saturating_add(cycle.saturating_mul(cycles));
        }

        let rest_of_cycle = self.config.phases[self.state.phase_index + 1..]
            .iter()
            .fold(0u64, |sum, phase| sum.saturating_add(u64::from(phase.duration_seconds)));
        let later_cycles = cycles.saturating_sub(u64::from(self.state.cycle_index));

        remaining
            .saturating_add(rest_of_cycle)
            .saturating_add(later_cycles.saturating_mul(cycle))
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

fn phase_at<'a>(config: &'a TimerConfig, state: &TimerState) -> &'a PhaseDefinition {
    match (&config.lead_in, state.in_lead_in) {
        (Some(lead_in), true) => lead_in,
        _ => &config.phases[state.phase_index],
    }
}
