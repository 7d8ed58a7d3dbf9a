//! Cue player background task

use std::{collections::BTreeMap, time::Duration};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    engine::Cue,
    services::{CueEvent, CueSignal, CueSink},
};

/// Default time between repeats of the finished alarm
pub const DEFAULT_ALARM_INTERVAL: Duration = Duration::from_secs(4);

/// Background task that turns cue events into sounds.
///
/// Every cue is played once. A `Finished` cue keeps re-playing every
/// `alarm_interval` until the timer is acknowledged, reset or removed, so a
/// sound that failed to play is retried.
///
/// `still_alarming` reports whether a timer's alarm is still unacknowledged.
/// It is consulted before every repeat and after the receiver lags, so a
/// `Silence` lost from the channel cannot leave an alarm sounding.
pub async fn cue_player_task<S, F>(
    mut cues: broadcast::Receiver<CueEvent>,
    mut sink: S,
    alarm_interval: Duration,
    still_alarming: F,
) where
    S: CueSink,
    F: Fn(u64) -> bool,
{
    info!("Starting cue player (finished alarm every {:?})", alarm_interval);

    let mut alarming: BTreeMap<u64, String> = BTreeMap::new();
    let mut repeat = interval_at(Instant::now() + alarm_interval, alarm_interval);
    repeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = repeat.tick(), if !alarming.is_empty() => {
                alarming.retain(|timer_id, _| still_alarming(*timer_id));
                for (timer_id, label) in &alarming {
                    debug!("Repeating finished alarm for timer {}", timer_id);
                    sink.play(*timer_id, label, Cue::Finished.sound_name());
                }
            }

            received = cues.recv() => match received {
                Ok(CueEvent { timer_id, label, signal }) => match signal {
                    CueSignal::Play(cue) => {
                        sink.play(timer_id, &label, cue.sound_name());

                        if cue == Cue::Finished {
                            if alarming.is_empty() {
                                repeat.reset();
                            }
                            alarming.insert(timer_id, label);
                        }
                    }
                    CueSignal::Silence => {
                        if alarming.remove(&timer_id).is_some() {
                            info!("Finished alarm for timer {} ({}) silenced", timer_id, label);
                        }
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Cue player fell behind, {} cues skipped", skipped);
                    alarming.retain(|timer_id, _| still_alarming(*timer_id));
                }
                Err(RecvError::Closed) => {
                    info!("Cue channel closed, stopping cue player");
                    break;
                }
            }
        }
    }
}
