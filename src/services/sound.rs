//! Sound cue playback

use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Destination for cues that should become audible
pub trait CueSink: Send {
    /// Request playback of `sound` for a timer. Must not block.
    fn play(&mut self, timer_id: u64, label: &str, sound: &str);
}

/// Plays cues by spawning an external command, fire-and-forget
#[derive(Debug, Clone, Default)]
pub struct SoundPlayer {
    program: Option<String>,
    args: Vec<String>,
}

impl SoundPlayer {
    /// Build a player from a command line such as `paplay --volume 40000`.
    /// The sound name is appended as the last argument on each play.
    pub fn new(command: Option<&str>) -> Self {
        let mut parts = command
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string);

        Self {
            program: parts.next(),
            args: parts.collect(),
        }
    }

    /// Check if a playback command is configured
    pub fn is_enabled(&self) -> bool {
        self.program.is_some()
    }
}

impl CueSink for SoundPlayer {
    fn play(&mut self, timer_id: u64, label: &str, sound: &str) {
        info!("Timer {} ({}): cue '{}'", timer_id, label, sound);

        let Some(program) = &self.program else {
            debug!("No sound command configured, cue '{}' not played", sound);
            return;
        };

        let spawned = Command::new(program)
            .args(&self.args)
            .arg(sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn();

        match spawned {
            Ok(mut child) => {
                // Reap the child in the background so playback never blocks the caller
                let sound = sound.to_string();
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if status.success() => debug!("Cue '{}' played", sound),
                        Ok(status) => warn!("Sound command for '{}' exited with {}", sound, status),
                        Err(e) => warn!("Failed to wait on sound command for '{}': {}", sound, e),
                    }
                });
            }
            Err(e) => warn!("Failed to execute sound command {}: {}", program, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_command_line() {
        let player = SoundPlayer::new(Some("paplay --volume 40000"));
        assert_eq!(player.program.as_deref(), Some("paplay"));
        assert_eq!(player.args, vec!["--volume", "40000"]);
        assert!(player.is_enabled());
    }

    #[test]
    fn blank_command_disables_playback() {
        assert!(!SoundPlayer::new(None).is_enabled());
        assert!(!SoundPlayer::new(Some("   ")).is_enabled());
    }

    #[tokio::test]
    async fn missing_program_is_tolerated() {
        let mut player = SoundPlayer::new(Some("definitely-not-a-real-sound-player"));
        player.play(1, "test", "finished");
    }
}
