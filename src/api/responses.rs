//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    engine::{HiitProtocol, Preset, TimerConfig},
    state::TimerSnapshot,
};

/// Body of POST /timers. Exactly one of `preset` or `config` must be given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimerRequest {
    pub label: Option<String>,
    pub preset: Option<Preset>,
    pub config: Option<TimerConfig>,
    /// Start counting down immediately after creation
    #[serde(default)]
    pub autostart: bool,
}

/// API response structure for timer endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerSnapshot>,
}

impl ApiResponse {
    pub fn new(status: &str, message: String, timer: Option<TimerSnapshot>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a success response carrying a timer snapshot
    pub fn ok(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ok", message, Some(timer))
    }

    /// Create an error response
    pub fn error(message: String) -> Self {
        Self::new("error", message, None)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerListResponse {
    pub count: usize,
    pub timers: Vec<TimerSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetsResponse {
    pub presets: Vec<Preset>,
    pub hiit_protocols: &'static [HiitProtocol],
}

/// Server status with timer counts
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timers: usize,
    pub running_timers: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
