//! Notification capability used by the engine to request sound cues

use serde::{Deserialize, Serialize};

/// Receiver of phase-transition and completion events.
///
/// Calls are fire-and-forget requests to play a cue. Implementations must
/// not block and may silently fail to play anything; the engine's countdown
/// does not depend on the outcome.
pub trait Notifier {
    /// The phase named `phase` has just ended
    fn phase_complete(&mut self, phase: &str);

    /// The configured number of cycles has completed
    fn finished(&mut self);

    /// The phase named `phase` has `remaining_seconds` left
    fn phase_warning(&mut self, _phase: &str, _remaining_seconds: u32) {}
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn phase_complete(&mut self, phase: &str) {
        (**self).phase_complete(phase);
    }

    fn finished(&mut self) {
        (**self).finished();
    }

    fn phase_warning(&mut self, phase: &str, remaining_seconds: u32) {
        (**self).phase_warning(phase, remaining_seconds);
    }
}

/// A single requested sound cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cue {
    PhaseComplete {
        phase: String,
    },
    #[serde(rename_all = "camelCase")]
    PhaseWarning {
        phase: String,
        remaining_seconds: u32,
    },
    Finished,
}

impl Cue {
    /// Name of the sound that should be played for this cue
    pub fn sound_name(&self) -> &'static str {
        match self {
            Cue::PhaseComplete { .. } => "transition",
            Cue::PhaseWarning { .. } => "warning",
            Cue::Finished => "finished",
        }
    }
}

/// Notifier that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn phase_complete(&mut self, _phase: &str) {}

    fn finished(&mut self) {}
}

/// Notifier that keeps every cue in order, for inspection
#[derive(Debug, Default, Clone)]
pub struct CueRecorder {
    cues: Vec<Cue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Drain the recorded cues
    pub fn take(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl Notifier for CueRecorder {
    fn phase_complete(&mut self, phase: &str) {
        self.cues.push(Cue::PhaseComplete {
            phase: phase.to_string(),
        });
    }

    fn finished(&mut self) {
        self.cues.push(Cue::Finished);
    }

    fn phase_warning(&mut self, phase: &str, remaining_seconds: u32) {
        self.cues.push(Cue::PhaseWarning {
            phase: phase.to_string(),
            remaining_seconds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_serializes_with_kind_tag() {
        let json = serde_json::to_value(Cue::PhaseWarning {
            phase: "round".to_string(),
            remaining_seconds: 10,
        })
        .unwrap();

        assert_eq!(json["kind"], "phaseWarning");
        assert_eq!(json["remainingSeconds"], 10);
        assert_eq!(serde_json::to_value(Cue::Finished).unwrap()["kind"], "finished");
    }

    #[test]
    fn borrowed_notifier_forwards_to_owner() {
        fn drive(mut notifier: impl Notifier) {
            notifier.phase_complete("work");
            notifier.finished();
        }

        let mut recorder = CueRecorder::new();
        drive(&mut recorder);

        assert_eq!(
            recorder.take(),
            vec![
                Cue::PhaseComplete {
                    phase: "work".to_string()
                },
                Cue::Finished
            ]
        );
        assert!(recorder.cues().is_empty());
    }
}
