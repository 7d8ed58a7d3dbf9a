//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "phase-timer")]
#[command(about = "An HTTP server hosting phase-sequencing workout timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Seconds between repeats of the finished alarm until acknowledged
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u64).range(1..))]
    pub alarm_interval: u64,

    /// Command run for every cue; the cue name is appended as the last argument
    #[arg(short, long)]
    pub sound_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn alarm_interval(&self) -> Duration {
        Duration::from_secs(self.alarm_interval)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["phase-timer"]).unwrap();

        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.alarm_interval(), Duration::from_secs(4));
        assert!(config.sound_command.is_none());
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn parses_sound_command_and_verbose() {
        let config = Config::try_parse_from([
            "phase-timer",
            "--sound-command",
            "paplay --volume 30000",
            "-v",
            "--alarm-interval",
            "2",
        ])
        .unwrap();

        assert_eq!(config.sound_command.as_deref(), Some("paplay --volume 30000"));
        assert_eq!(config.alarm_interval(), Duration::from_secs(2));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn rejects_zero_alarm_interval() {
        assert!(Config::try_parse_from(["phase-timer", "--alarm-interval", "0"]).is_err());
    }
}
