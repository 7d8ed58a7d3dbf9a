//! Built-in timer presets
//!
//! Each preset maps user-facing settings onto a [`TimerConfig`]. Defaults
//! match the classic widget settings (Tabata 20/10 x 8, boxing 3 min rounds
//! with a 10 second clapper, Pomodoro 25/5/15 and so on). A prepare time of
//! zero means "no lead-in".

use serde::{Deserialize, Serialize};

use super::{PhaseDefinition, TimerConfig, TimerError, MAX_PHASES};

/// Named HIIT work/rest protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiitProtocol {
    pub name: &'static str,
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub rounds: u32,
    pub description: &'static str,
}

pub const HIIT_PROTOCOLS: &[HiitProtocol] = &[
    HiitProtocol {
        name: "Classic Tabata",
        work_seconds: 20,
        rest_seconds: 10,
        rounds: 8,
        description: "4 minutes of intense training",
    },
    HiitProtocol {
        name: "Sprint Intervals",
        work_seconds: 30,
        rest_seconds: 30,
        rounds: 10,
        description: "Balanced work-rest ratio",
    },
    HiitProtocol {
        name: "Power Intervals",
        work_seconds: 15,
        rest_seconds: 45,
        rounds: 8,
        description: "Short bursts, long recovery",
    },
    HiitProtocol {
        name: "Endurance HIIT",
        work_seconds: 45,
        rest_seconds: 15,
        rounds: 12,
        description: "Longer work periods",
    },
    HiitProtocol {
        name: "Quick Burner",
        work_seconds: 10,
        rest_seconds: 20,
        rounds: 15,
        description: "Quick, intense bursts",
    },
];

impl HiitProtocol {
    /// Look up a protocol by name, ignoring case
    pub fn find(name: &str) -> Option<&'static HiitProtocol> {
        HIIT_PROTOCOLS
            .iter()
            .find(|protocol| protocol.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Single hours/minutes/seconds countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountdownSettings {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 5,
            seconds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabataSettings {
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub rounds: u32,
    pub prepare_seconds: u32,
}

impl Default for TabataSettings {
    fn default() -> Self {
        Self {
            work_seconds: 20,
            rest_seconds: 10,
            rounds: 8,
            prepare_seconds: 10,
        }
    }
}

/// HIIT settings: a named protocol, optionally overridden field by field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HiitSettings {
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    pub prepare_seconds: u32,
}

impl Default for HiitSettings {
    fn default() -> Self {
        Self {
            protocol: HIIT_PROTOCOLS[0].name.to_string(),
            work_seconds: None,
            rest_seconds: None,
            rounds: None,
            prepare_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalSet {
    pub work_seconds: u32,
    pub rest_seconds: u32,
}

/// Sequence of work/rest intervals repeated for a number of sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntervalSettings {
    pub intervals: Vec<IntervalSet>,
    pub sets: u32,
    pub prepare_seconds: u32,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            intervals: vec![IntervalSet {
                work_seconds: 30,
                rest_seconds: 15,
            }],
            sets: 5,
            prepare_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxingSettings {
    pub round_seconds: u32,
    pub rest_seconds: u32,
    pub rounds: u32,
    pub prepare_seconds: u32,
    /// Seconds before the end of a round to sound the clapper; 0 disables it
    pub warning_seconds: u32,
}

impl Default for BoxingSettings {
    fn default() -> Self {
        Self {
            round_seconds: 3 * 60,
            rest_seconds: 60,
            rounds: 12,
            prepare_seconds: 10,
            warning_seconds: 10,
        }
    }
}

/// Pomodoro settings, in minutes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_until_long_break: u32,
    /// Number of long-break cycles before the timer finishes
    pub cycles: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_until_long_break: 4,
            cycles: 1,
        }
    }
}

/// A preconfigured timer kind with its settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Preset {
    Countdown(CountdownSettings),
    Tabata(TabataSettings),
    Hiit(HiitSettings),
    Interval(IntervalSettings),
    Boxing(BoxingSettings),
    Pomodoro(PomodoroSettings),
}

impl Preset {
    /// Every preset kind with its default settings
    pub fn defaults() -> Vec<Preset> {
        vec![
            Preset::Countdown(CountdownSettings::default()),
            Preset::Tabata(TabataSettings::default()),
            Preset::Hiit(HiitSettings::default()),
            Preset::Interval(IntervalSettings::default()),
            Preset::Boxing(BoxingSettings::default()),
            Preset::Pomodoro(PomodoroSettings::default()),
        ]
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Preset::Countdown(_) => "countdown",
            Preset::Tabata(_) => "tabata",
            Preset::Hiit(_) => "hiit",
            Preset::Interval(_) => "interval",
            Preset::Boxing(_) => "boxing",
            Preset::Pomodoro(_) => "pomodoro",
        }
    }

    /// Build and validate the timer configuration for this preset
    pub fn to_config(&self) -> Result<TimerConfig, TimerError> {
        let config = match self {
            Preset::Countdown(s) => {
                let total = s
                    .hours
                    .saturating_mul(3600)
                    .saturating_add(s.minutes.saturating_mul(60))
                    .saturating_add(s.seconds);
                TimerConfig::new(vec![PhaseDefinition::new("countdown", total)], 1)
            }
            Preset::Tabata(s) => with_prepare(
                TimerConfig::new(
                    vec![
                        PhaseDefinition::new("work", s.work_seconds),
                        PhaseDefinition::new("rest", s.rest_seconds),
                    ],
                    s.rounds,
                ),
                s.prepare_seconds,
            ),
            Preset::Hiit(s) => {
                let protocol = HiitProtocol::find(&s.protocol).ok_or_else(|| {
                    TimerError::invalid(format!("unknown HIIT protocol '{}'", s.protocol))
                })?;
                with_prepare(
                    TimerConfig::new(
                        vec![
                            PhaseDefinition::new(
                                "work",
                                s.work_seconds.unwrap_or(protocol.work_seconds),
                            ),
                            PhaseDefinition::new(
                                "rest",
                                s.rest_seconds.unwrap_or(protocol.rest_seconds),
                            ),
                        ],
                        s.rounds.unwrap_or(protocol.rounds),
                    ),
                    s.prepare_seconds,
                )
            }
            Preset::Interval(s) => {
                if s.intervals.len() > MAX_PHASES / 2 {
                    return Err(TimerError::invalid(format!(
                        "at most {} interval sets are allowed",
                        MAX_PHASES / 2
                    )));
                }
                let phases = s
                    .intervals
                    .iter()
                    .flat_map(|set| {
                        [
                            PhaseDefinition::new("work", set.work_seconds),
                            PhaseDefinition::new("rest", set.rest_seconds),
                        ]
                    })
                    .collect();
                with_prepare(TimerConfig::new(phases, s.sets), s.prepare_seconds)
            }
            Preset::Boxing(s) => {
                let mut round = PhaseDefinition::new("round", s.round_seconds);
                if s.warning_seconds > 0 {
                    round = round.with_warning(s.warning_seconds);
                }
                with_prepare(
                    TimerConfig::new(
                        vec![round, PhaseDefinition::new("rest", s.rest_seconds)],
                        s.rounds,
                    ),
                    s.prepare_seconds,
                )
            }
            Preset::Pomodoro(s) => {
                if s.sessions_until_long_break < 1 {
                    return Err(TimerError::invalid(
                        "pomodoro needs at least one session before the long break",
                    ));
                }
                if s.sessions_until_long_break as usize > MAX_PHASES / 2 {
                    return Err(TimerError::invalid(format!(
                        "at most {} sessions before the long break are allowed",
                        MAX_PHASES / 2
                    )));
                }
                let mut phases = Vec::new();
                for session in 1..=s.sessions_until_long_break {
                    phases.push(PhaseDefinition::new("work", s.work_minutes.saturating_mul(60)));
                    if session < s.sessions_until_long_break {
                        phases.push(PhaseDefinition::new(
                            "short_break",
                            s.short_break_minutes.saturating_mul(60),
                        ));
                    } else {
                        phases.push(PhaseDefinition::new(
                            "long_break",
                            s.long_break_minutes.saturating_mul(60),
                        ));
                    }
                }
                TimerConfig::new(phases, s.cycles)
            }
        };

        config.validate()?;
        Ok(config)
    }
}

fn with_prepare(config: TimerConfig, prepare_seconds: u32) -> TimerConfig {
    if prepare_seconds > 0 {
        config.with_lead_in(PhaseDefinition::new("prepare", prepare_seconds))
    } else {
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(config: &TimerConfig) -> Vec<&str> {
        config.phases.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn every_default_preset_is_valid() {
        for preset in Preset::defaults() {
            assert!(preset.to_config().is_ok(), "{} failed", preset.kind());
        }
    }

    #[test]
    fn tabata_defaults() {
        let config = Preset::Tabata(TabataSettings::default()).to_config().unwrap();

        assert_eq!(names(&config), vec!["work", "rest"]);
        assert_eq!(config.phases[0].duration_seconds, 20);
        assert_eq!(config.phases[1].duration_seconds, 10);
        assert_eq!(config.cycle_count, 8);
        assert_eq!(config.lead_in, Some(PhaseDefinition::new("prepare", 10)));
    }

    #[test]
    fn zero_prepare_means_no_lead_in() {
        let settings = TabataSettings {
            prepare_seconds: 0,
            ..Default::default()
        };
        let config = Preset::Tabata(settings).to_config().unwrap();
        assert!(config.lead_in.is_none());
    }

    #[test]
    fn boxing_round_carries_the_clapper() {
        let config = Preset::Boxing(BoxingSettings::default()).to_config().unwrap();

        assert_eq!(config.phases[0].name, "round");
        assert_eq!(config.phases[0].duration_seconds, 180);
        assert_eq!(config.phases[0].warning_seconds, Some(10));
        assert_eq!(config.phases[1].warning_seconds, None);
        assert_eq!(config.cycle_count, 12);
    }

    #[test]
    fn hiit_protocol_lookup_and_overrides() {
        let settings = HiitSettings {
            protocol: "sprint intervals".to_string(),
            rounds: Some(3),
            ..Default::default()
        };
        let config = Preset::Hiit(settings).to_config().unwrap();
        assert_eq!(config.phases[0].duration_seconds, 30);
        assert_eq!(config.phases[1].duration_seconds, 30);
        assert_eq!(config.cycle_count, 3);

        let unknown = HiitSettings {
            protocol: "Nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Preset::Hiit(unknown).to_config(),
            Err(TimerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn interval_flattens_sets_into_phases() {
        let settings = IntervalSettings {
            intervals: vec![
                IntervalSet {
                    work_seconds: 40,
                    rest_seconds: 20,
                },
                IntervalSet {
                    work_seconds: 20,
                    rest_seconds: 10,
                },
            ],
            sets: 3,
            prepare_seconds: 0,
        };
        let config = Preset::Interval(settings).to_config().unwrap();

        assert_eq!(names(&config), vec!["work", "rest", "work", "rest"]);
        assert_eq!(config.cycle_seconds(), 90);
        assert_eq!(config.total_seconds(), 270);
    }

    #[test]
    fn interval_without_sets_is_rejected() {
        let settings = IntervalSettings {
            intervals: Vec::new(),
            ..Default::default()
        };
        assert!(Preset::Interval(settings).to_config().is_err());
    }

    #[test]
    fn pomodoro_places_long_break_after_last_session() {
        let config = Preset::Pomodoro(PomodoroSettings::default()).to_config().unwrap();

        assert_eq!(
            names(&config),
            vec![
                "work",
                "short_break",
                "work",
                "short_break",
                "work",
                "short_break",
                "work",
                "long_break"
            ]
        );
        assert_eq!(config.phases[0].duration_seconds, 25 * 60);
        assert_eq!(config.phases[7].duration_seconds, 15 * 60);
    }

    #[test]
    fn oversized_session_and_set_counts_are_rejected() {
        let pomodoro = PomodoroSettings {
            sessions_until_long_break: 2_000_000,
            ..Default::default()
        };
        assert!(matches!(
            Preset::Pomodoro(pomodoro).to_config(),
            Err(TimerError::InvalidConfig(_))
        ));

        let widest = PomodoroSettings {
            sessions_until_long_break: (MAX_PHASES / 2) as u32,
            ..Default::default()
        };
        assert_eq!(
            Preset::Pomodoro(widest).to_config().unwrap().phases.len(),
            MAX_PHASES
        );

        let intervals = IntervalSettings {
            intervals: vec![
                IntervalSet {
                    work_seconds: 30,
                    rest_seconds: 15,
                };
                MAX_PHASES / 2 + 1
            ],
            ..Default::default()
        };
        assert!(Preset::Interval(intervals).to_config().is_err());
    }

    #[test]
    fn countdown_of_zero_is_rejected() {
        let settings = CountdownSettings {
            hours: 0,
            minutes: 0,
            seconds: 0,
        };
        assert!(Preset::Countdown(settings).to_config().is_err());
    }

    #[test]
    fn preset_json_uses_kind_tag_and_fills_defaults() {
        let preset: Preset = serde_json::from_str(r#"{"kind": "boxing", "rounds": 3}"#).unwrap();
        assert_eq!(
            preset,
            Preset::Boxing(BoxingSettings {
                rounds: 3,
                ..Default::default()
            })
        );
    }
}
