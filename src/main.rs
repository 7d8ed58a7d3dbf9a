//! Phase Timer - an HTTP server hosting phase-sequencing workout timers
//!
//! This is the main entry point for the phase-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use phase_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    services::SoundPlayer,
    tasks::cue_player_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("phase_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting phase-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, alarm_interval={}s",
          config.host, config.port, config.alarm_interval);

    let player = SoundPlayer::new(config.sound_command.as_deref());
    if !player.is_enabled() {
        warn!("No sound command configured, cues will only be logged");
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone()));

    // Start the cue player background task
    let alarms = Arc::clone(&state);
    tokio::spawn(cue_player_task(
        state.subscribe_cues(),
        player,
        config.alarm_interval(),
        move |id| alarms.is_alarming(id),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                 - List timers");
    info!("  POST   /timers                 - Create a timer from a preset or config");
    info!("  GET    /timers/:id             - Inspect a timer");
    info!("  DELETE /timers/:id             - Remove a timer");
    info!("  POST   /timers/:id/start       - Start or resume");
    info!("  POST   /timers/:id/pause       - Pause");
    info!("  POST   /timers/:id/reset       - Reset to the first phase");
    info!("  POST   /timers/:id/acknowledge - Silence the finished alarm");
    info!("  GET    /presets                - Preset defaults");
    info!("  GET    /status                 - Server status");
    info!("  GET    /health                 - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
