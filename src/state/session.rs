//! Handles to running timer sessions and their snapshots

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};

use crate::engine::{Notifier, PhaseSequenceTimer, TimerConfig, TimerState};

/// Operation requested of a timer's driver task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Pause,
    Reset,
    /// Silence the repeating finished alarm
    Acknowledge,
    /// Stop the driver task
    Shutdown,
}

impl TimerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerAction::Start => "start",
            TimerAction::Pause => "pause",
            TimerAction::Reset => "reset",
            TimerAction::Acknowledge => "acknowledge",
            TimerAction::Shutdown => "remove",
        }
    }
}

/// A command plus the channel the driver answers on
#[derive(Debug)]
pub struct SessionCommand {
    pub action: TimerAction,
    pub reply: oneshot::Sender<TimerSnapshot>,
}

/// Point-in-time view of a timer, as reported to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub id: u64,
    pub label: String,
    /// Name of the current phase, or "finished" once terminal
    pub phase: String,
    pub state: TimerState,
    pub phase_progress: f64,
    pub total_remaining_seconds: u64,
    /// The finished alarm is sounding and has not been acknowledged
    pub alarming: bool,
    pub config: TimerConfig,
    pub updated_at: DateTime<Utc>,
}

impl TimerSnapshot {
    pub fn capture<N: Notifier>(
        id: u64,
        label: &str,
        timer: &PhaseSequenceTimer<N>,
        alarming: bool,
    ) -> Self {
        let phase = if timer.is_terminal() {
            "finished".to_string()
        } else {
            timer.current_phase().name.clone()
        };

        Self {
            id,
            label: label.to_string(),
            phase,
            state: timer.state(),
            phase_progress: timer.phase_progress(),
            total_remaining_seconds: timer.total_remaining_seconds(),
            alarming,
            config: timer.config().clone(),
            updated_at: Utc::now(),
        }
    }
}

/// Client-side handle to a timer owned by its driver task
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: u64,
    pub label: String,
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
}

impl SessionHandle {
    pub fn new(
        id: u64,
        label: String,
        commands: mpsc::Sender<SessionCommand>,
        snapshots: watch::Receiver<TimerSnapshot>,
    ) -> Self {
        Self {
            id,
            label,
            commands,
            snapshots,
        }
    }

    /// Latest snapshot published by the driver
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Send an action to the driver and wait for the resulting snapshot
    pub async fn send(&self, action: TimerAction) -> Result<TimerSnapshot, String> {
        let (reply, response) = oneshot::channel();

        self.commands
            .send(SessionCommand { action, reply })
            .await
            .map_err(|_| format!("Timer {} driver is no longer running", self.id))?;

        response
            .await
            .map_err(|_| format!("Timer {} driver dropped the {} reply", self.id, action.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PhaseDefinition, Silent};

    #[test]
    fn snapshot_reports_finished_phase_when_terminal() {
        let config = TimerConfig::new(vec![PhaseDefinition::new("work", 1)], 1);
        let mut timer = PhaseSequenceTimer::new(config, Silent).unwrap();

        let fresh = TimerSnapshot::capture(3, "quick", &timer, false);
        assert_eq!(fresh.phase, "work");
        assert_eq!(fresh.total_remaining_seconds, 1);

        timer.start();
        timer.tick();
        let done = TimerSnapshot::capture(3, "quick", &timer, true);
        assert_eq!(done.phase, "finished");
        assert!(done.state.terminal);
        assert_eq!(done.phase_progress, 100.0);
        assert!(done.alarming);
    }

    #[test]
    fn snapshot_json_is_camel_case() {
        let config = TimerConfig::new(vec![PhaseDefinition::new("work", 5)], 2);
        let timer = PhaseSequenceTimer::new(config, Silent).unwrap();
        let json = serde_json::to_value(TimerSnapshot::capture(1, "t", &timer, false)).unwrap();

        assert_eq!(json["totalRemainingSeconds"], 10);
        assert_eq!(json["state"]["remainingSeconds"], 5);
        assert_eq!(json["state"]["cycleIndex"], 1);
        assert_eq!(json["config"]["cycleCount"], 2);
        assert_eq!(json["alarming"], false);
    }
}
