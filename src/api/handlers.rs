//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    engine::{Preset, TimerError, HIIT_PROTOCOLS},
    state::{AppState, StateError, TimerAction},
};
use super::responses::{
    ApiResponse, CreateTimerRequest, HealthResponse, PresetsResponse, StatusResponse,
    TimerListResponse,
};

type ApiError = (StatusCode, Json<ApiResponse>);
type ApiResult = Result<Json<ApiResponse>, ApiError>;

fn failure(e: StateError) -> ApiError {
    let status = match &e {
        StateError::InvalidConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StateError::NotFound(_) => StatusCode::NOT_FOUND,
        StateError::Driver(_) | StateError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }
    (status, Json(ApiResponse::error(e.to_string())))
}

/// Handle POST /timers - Create a timer from a preset or explicit config
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTimerRequest>,
) -> ApiResult {
    let config = match (request.preset, request.config) {
        (Some(preset), None) => {
            info!("Creating timer from {} preset", preset.kind());
            preset.to_config().map_err(|e| failure(e.into()))?
        }
        (None, Some(config)) => config,
        _ => {
            return Err(failure(
                TimerError::InvalidConfig(
                    "provide exactly one of 'preset' or 'config'".to_string(),
                )
                .into(),
            ));
        }
    };

    let mut snapshot = state.create_timer(request.label, config).map_err(failure)?;
    if request.autostart {
        snapshot = state
            .apply(snapshot.id, TimerAction::Start)
            .await
            .map_err(failure)?;
    }

    Ok(Json(ApiResponse::ok(
        format!("Timer {} created", snapshot.id),
        snapshot,
    )))
}

/// Handle GET /timers - List all timers
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerListResponse>, ApiError> {
    let timers = state.list_snapshots().map_err(failure)?;

    Ok(Json(TimerListResponse {
        count: timers.len(),
        timers,
    }))
}

/// Handle GET /timers/:id - Return one timer
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    let snapshot = state.snapshot(id).map_err(failure)?;
    Ok(Json(ApiResponse::ok(format!("Timer {}", id), snapshot)))
}

async fn apply_action(state: &AppState, id: u64, action: TimerAction, message: &str) -> ApiResult {
    let snapshot = state.apply(id, action).await.map_err(failure)?;
    Ok(Json(ApiResponse::ok(format!("Timer {} {}", id, message), snapshot)))
}

/// Handle POST /timers/:id/start - Start or resume a timer
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    apply_action(&state, id, TimerAction::Start, "started").await
}

/// Handle POST /timers/:id/pause - Pause a timer
pub async fn pause_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    apply_action(&state, id, TimerAction::Pause, "paused").await
}

/// Handle POST /timers/:id/reset - Reset a timer to its first phase
pub async fn reset_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    apply_action(&state, id, TimerAction::Reset, "reset").await
}

/// Handle POST /timers/:id/acknowledge - Silence the finished alarm
pub async fn acknowledge_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    apply_action(&state, id, TimerAction::Acknowledge, "acknowledged").await
}

/// Handle DELETE /timers/:id - Stop and remove a timer
pub async fn remove_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult {
    let snapshot = state.remove_timer(id).await.map_err(failure)?;
    Ok(Json(ApiResponse::ok(format!("Timer {} removed", id), snapshot)))
}

/// Handle GET /presets - List preset kinds with their defaults
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: Preset::defaults(),
        hiit_protocols: HIIT_PROTOCOLS,
    })
}

/// Handle GET /status - Return current server status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let (timers, running_timers) = match state.timer_counts() {
        Ok(counts) => counts,
        Err(e) => {
            error!("Failed to count timers: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timers,
        running_timers,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
