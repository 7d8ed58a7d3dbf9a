//! Cue events flowing from timer drivers to the cue player

use tokio::sync::broadcast;
use tracing::debug;

use crate::engine::{Cue, Notifier};

/// What the cue player should do for a timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueSignal {
    /// Play a cue once; `Finished` also starts the repeating alarm
    Play(Cue),
    /// Stop any repeating alarm for the timer
    Silence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueEvent {
    pub timer_id: u64,
    pub label: String,
    pub signal: CueSignal,
}

/// Engine notifier that forwards every notification onto the cue channel
#[derive(Debug, Clone)]
pub struct CueForwarder {
    timer_id: u64,
    label: String,
    tx: broadcast::Sender<CueEvent>,
}

impl CueForwarder {
    pub fn new(timer_id: u64, label: String, tx: broadcast::Sender<CueEvent>) -> Self {
        Self { timer_id, label, tx }
    }

    /// Ask the cue player to stop alarming for this timer
    pub fn silence(&self) {
        self.send(CueSignal::Silence);
    }

    fn send(&self, signal: CueSignal) {
        let event = CueEvent {
            timer_id: self.timer_id,
            label: self.label.clone(),
            signal,
        };

        // No subscribers just means nobody is listening for sound
        if self.tx.send(event).is_err() {
            debug!("Timer {}: no cue listeners", self.timer_id);
        }
    }
}

impl Notifier for CueForwarder {
    fn phase_complete(&mut self, phase: &str) {
        self.send(CueSignal::Play(Cue::PhaseComplete {
            phase: phase.to_string(),
        }));
    }

    fn finished(&mut self) {
        self.send(CueSignal::Play(Cue::Finished));
    }

    fn phase_warning(&mut self, phase: &str, remaining_seconds: u32) {
        self.send(CueSignal::Play(Cue::PhaseWarning {
            phase: phase.to_string(),
            remaining_seconds,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_notifications_in_order() {
        let (tx, mut rx) = broadcast::channel(8);
        let mut forwarder = CueForwarder::new(7, "tabata".to_string(), tx);

        forwarder.phase_complete("work");
        forwarder.finished();
        forwarder.silence();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.timer_id, 7);
        assert_eq!(first.label, "tabata");
        assert_eq!(
            first.signal,
            CueSignal::Play(Cue::PhaseComplete {
                phase: "work".to_string()
            })
        );
        assert_eq!(rx.try_recv().unwrap().signal, CueSignal::Play(Cue::Finished));
        assert_eq!(rx.try_recv().unwrap().signal, CueSignal::Silence);
    }

    #[test]
    fn sending_without_listeners_does_not_panic() {
        let (tx, rx) = broadcast::channel(8);
        drop(rx);
        let mut forwarder = CueForwarder::new(1, "t".to_string(), tx);
        forwarder.finished();
    }
}
