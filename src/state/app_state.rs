//! Main application state: the registry of running timers

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{info, warn};

use super::{SessionHandle, StateError, TimerAction, TimerSnapshot};
use crate::{
    engine::{PhaseSequenceTimer, TimerConfig},
    services::{CueEvent, CueForwarder},
    tasks::timer_driver_task,
};

/// Main application state shared by all HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// Handles to every live timer, keyed by id
    sessions: Mutex<HashMap<u64, SessionHandle>>,
    next_id: AtomicU64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel carrying cues from timer drivers to the cue player
    pub cue_tx: broadcast::Sender<CueEvent>,
}

impl AppState {
    pub fn new(port: u16, host: String) -> Self {
        let (cue_tx, _) = broadcast::channel(100);

        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            cue_tx,
        }
    }

    /// Receiver for every cue emitted by any timer
    pub fn subscribe_cues(&self) -> broadcast::Receiver<CueEvent> {
        self.cue_tx.subscribe()
    }

    /// Build a timer for `config` and spawn its driver task. The timer starts paused.
    pub fn create_timer(
        &self,
        label: Option<String>,
        config: TimerConfig,
    ) -> Result<TimerSnapshot, StateError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let label = label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("timer-{}", id));

        let notifier = CueForwarder::new(id, label.clone(), self.cue_tx.clone());
        let timer = PhaseSequenceTimer::new(config, notifier)?;
        let snapshot = TimerSnapshot::capture(id, &label, &timer, false);

        let (command_tx, command_rx) = mpsc::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot.clone());

        self.sessions
            .lock()
            .map_err(|_| StateError::Lock("timer sessions"))?
            .insert(id, SessionHandle::new(id, label.clone(), command_tx, snapshot_rx));

        tokio::spawn(timer_driver_task(id, label.clone(), timer, command_rx, snapshot_tx));

        info!(
            "Created timer {} ({}): {} phases x {} cycles, {}s total",
            id,
            label,
            snapshot.config.phases.len(),
            snapshot.config.cycle_count,
            snapshot.config.total_seconds()
        );
        self.record_action(&format!("create timer {}", id));

        Ok(snapshot)
    }

    /// Handle for a live timer
    pub fn session(&self, id: u64) -> Result<SessionHandle, StateError> {
        self.sessions
            .lock()
            .map_err(|_| StateError::Lock("timer sessions"))?
            .get(&id)
            .cloned()
            .ok_or(StateError::NotFound(id))
    }

    /// Latest snapshot of a live timer
    pub fn snapshot(&self, id: u64) -> Result<TimerSnapshot, StateError> {
        Ok(self.session(id)?.snapshot())
    }

    /// Whether a live timer's finished alarm is still unacknowledged
    pub fn is_alarming(&self, id: u64) -> bool {
        self.snapshot(id).map_or(false, |snapshot| snapshot.alarming)
    }

    /// Snapshots of every live timer, ordered by id
    pub fn list_snapshots(&self) -> Result<Vec<TimerSnapshot>, StateError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| StateError::Lock("timer sessions"))?;

        let mut snapshots: Vec<TimerSnapshot> =
            sessions.values().map(SessionHandle::snapshot).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Ok(snapshots)
    }

    /// Apply an action to a timer and return its resulting snapshot
    pub async fn apply(&self, id: u64, action: TimerAction) -> Result<TimerSnapshot, StateError> {
        let handle = self.session(id)?;
        let snapshot = handle.send(action).await.map_err(StateError::Driver)?;

        self.record_action(&format!("{} timer {}", action.as_str(), id));
        Ok(snapshot)
    }

    /// Stop a timer's driver and forget it
    pub async fn remove_timer(&self, id: u64) -> Result<TimerSnapshot, StateError> {
        let handle = self
            .sessions
            .lock()
            .map_err(|_| StateError::Lock("timer sessions"))?
            .remove(&id)
            .ok_or(StateError::NotFound(id))?;

        let snapshot = match handle.send(TimerAction::Shutdown).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // The driver is already gone; its last published snapshot is still valid
                warn!("{}", e);
                handle.snapshot()
            }
        };

        info!("Removed timer {} ({})", id, handle.label);
        self.record_action(&format!("remove timer {}", id));
        Ok(snapshot)
    }

    /// Number of live timers and how many of them are running
    pub fn timer_counts(&self) -> Result<(usize, usize), StateError> {
        let snapshots = self.list_snapshots()?;
        let running = snapshots.iter().filter(|s| s.state.running).count();
        Ok((snapshots.len(), running))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
