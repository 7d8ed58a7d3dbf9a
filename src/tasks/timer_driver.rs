//! Per-timer driver task

use std::time::Duration;
use tokio::{
    sync::{mpsc, watch},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    engine::PhaseSequenceTimer,
    services::CueForwarder,
    state::{SessionCommand, TimerAction, TimerSnapshot},
};

/// Time between ticks delivered to a running timer
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that owns one timer, ticks it once per second while it
/// runs and applies commands sent by its [`SessionHandle`].
///
/// [`SessionHandle`]: crate::state::SessionHandle
pub async fn timer_driver_task(
    id: u64,
    label: String,
    mut timer: PhaseSequenceTimer<CueForwarder>,
    mut commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<TimerSnapshot>,
) {
    info!("Starting driver for timer {} ({})", id, label);

    // Late ticks are delayed rather than bursted; drift is not corrected
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Set when the timer finishes, cleared once the alarm is silenced
    let mut alarming = false;

    loop {
        tokio::select! {
            _ = ticker.tick(), if timer.is_running() => {
                let state = timer.tick();
                debug!(
                    "Timer {} tick: phase={} cycle={} remaining={}s",
                    id, timer.current_phase().name, state.cycle_index, state.remaining_seconds
                );

                if state.terminal {
                    alarming = true;
                    info!("Timer {} ({}) finished", id, label);
                }
                publish(&snapshots, id, &label, &timer, alarming);
            }

            command = commands.recv() => {
                let Some(SessionCommand { action, reply }) = command else {
                    debug!("Timer {} has no remaining handles, stopping driver", id);
                    break;
                };

                match action {
                    TimerAction::Start => {
                        let was_running = timer.is_running();
                        timer.start();
                        if !was_running && timer.is_running() {
                            // First tick lands one full period after the start
                            ticker.reset();
                            info!("Timer {} ({}) started", id, label);
                        }
                    }
                    TimerAction::Pause => {
                        timer.pause();
                        info!("Timer {} ({}) paused at {}s", id, label, timer.state().remaining_seconds);
                    }
                    TimerAction::Reset => {
                        timer.reset();
                        alarming = false;
                        timer.notifier().silence();
                        info!("Timer {} ({}) reset", id, label);
                    }
                    TimerAction::Acknowledge => {
                        alarming = false;
                        timer.notifier().silence();
                        info!("Timer {} ({}) acknowledged", id, label);
                    }
                    TimerAction::Shutdown => {
                        timer.pause();
                        alarming = false;
                        timer.notifier().silence();
                    }
                }

                let snapshot = publish(&snapshots, id, &label, &timer, alarming);
                if reply.send(snapshot).is_err() {
                    debug!("Timer {} caller went away before the {} reply", id, action.as_str());
                }

                if action == TimerAction::Shutdown {
                    break;
                }
            }
        }
    }

    info!("Driver for timer {} ({}) stopped", id, label);
}

fn publish(
    snapshots: &watch::Sender<TimerSnapshot>,
    id: u64,
    label: &str,
    timer: &PhaseSequenceTimer<CueForwarder>,
    alarming: bool,
) -> TimerSnapshot {
    let snapshot = TimerSnapshot::capture(id, label, timer, alarming);
    snapshots.send_replace(snapshot.clone());
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{Cue, PhaseDefinition, TimerConfig},
        services::{CueEvent, CueSignal},
    };
    use tokio::sync::{broadcast, oneshot};

    struct Harness {
        commands: mpsc::Sender<SessionCommand>,
        snapshots: watch::Receiver<TimerSnapshot>,
        cues: broadcast::Receiver<CueEvent>,
    }

    impl Harness {
        fn spawn(config: TimerConfig) -> Self {
            let (cue_tx, cues) = broadcast::channel(32);
            let timer =
                PhaseSequenceTimer::new(config, CueForwarder::new(1, "test".to_string(), cue_tx))
                    .unwrap();
            let (commands, command_rx) = mpsc::channel(4);
            let (snapshot_tx, snapshots) =
                watch::channel(TimerSnapshot::capture(1, "test", &timer, false));

            tokio::spawn(timer_driver_task(1, "test".to_string(), timer, command_rx, snapshot_tx));
            Self {
                commands,
                snapshots,
                cues,
            }
        }

        async fn send(&self, action: TimerAction) -> TimerSnapshot {
            let (reply, response) = oneshot::channel();
            self.commands
                .send(SessionCommand { action, reply })
                .await
                .unwrap();
            response.await.unwrap()
        }

        fn remaining(&self) -> u32 {
            self.snapshots.borrow().state.remaining_seconds
        }
    }

    fn work_rest() -> TimerConfig {
        TimerConfig::new(vec![PhaseDefinition::new("work", 3), PhaseDefinition::new("rest", 2)], 1)
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_tick_until_started() {
        let harness = Harness::spawn(work_rest());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(harness.remaining(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_while_running() {
        let harness = Harness::spawn(work_rest());
        let started = harness.send(TimerAction::Start).await;
        assert!(started.state.running);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(harness.remaining(), 1);

        let paused = harness.send(TimerAction::Pause).await;
        assert_eq!(paused.state.remaining_seconds, 1);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(harness.remaining(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_and_emits_cues() {
        let mut harness = Harness::spawn(work_rest());
        harness.send(TimerAction::Start).await;

        tokio::time::sleep(Duration::from_millis(5500)).await;
        let snapshot = harness.snapshots.borrow().clone();
        assert!(snapshot.state.terminal);
        assert_eq!(snapshot.phase, "finished");
        assert!(snapshot.alarming);

        let mut signals = Vec::new();
        while let Ok(event) = harness.cues.try_recv() {
            signals.push(event.signal);
        }
        assert_eq!(
            signals,
            vec![
                CueSignal::Play(Cue::PhaseComplete {
                    phase: "work".to_string()
                }),
                CueSignal::Play(Cue::PhaseComplete {
                    phase: "rest".to_string()
                }),
                CueSignal::Play(Cue::Finished),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn reset_silences_and_restores_initial_state() {
        let mut harness = Harness::spawn(work_rest());
        harness.send(TimerAction::Start).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let reset = harness.send(TimerAction::Reset).await;
        assert_eq!(reset.state.remaining_seconds, 3);
        assert!(!reset.state.running);

        let mut last = None;
        while let Ok(event) = harness.cues.try_recv() {
            last = Some(event.signal);
        }
        assert_eq!(last, Some(CueSignal::Silence));
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledge_after_finish_silences_the_alarm() {
        let mut harness = Harness::spawn(work_rest());
        harness.send(TimerAction::Start).await;
        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert!(harness.snapshots.borrow().alarming);

        let acknowledged = harness.send(TimerAction::Acknowledge).await;
        assert!(acknowledged.state.terminal);
        assert!(!acknowledged.alarming);
        assert!(!harness.snapshots.borrow().alarming);

        let mut signals = Vec::new();
        while let Ok(event) = harness.cues.try_recv() {
            signals.push(event.signal);
        }
        assert_eq!(
            &signals[signals.len() - 2..],
            &[CueSignal::Play(Cue::Finished), CueSignal::Silence]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_driver() {
        let harness = Harness::spawn(work_rest());
        harness.send(TimerAction::Shutdown).await;
        tokio::task::yield_now().await;

        let (reply, _response) = oneshot::channel();
        let result = harness
            .commands
            .send(SessionCommand {
                action: TimerAction::Start,
                reply,
            })
            .await;
        assert!(result.is_err());
    }
}
