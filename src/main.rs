//! Task Timers - A local task list daemon with per-task countdown timers
//! 
//! This is the main entry point for the task-timers application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use task_timers::{
    api::create_router,
    config::Config,
    services::alert_player,
    state::AppState,
    tasks::lifecycle_log_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("task_timers={},tower_http=info", config.log_level()))
        .init();

    info!("Starting task-timers server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, max_tasks={}, max_custom_minutes={}, mute={}",
          config.host, config.port, config.max_tasks, config.max_custom_minutes, config.mute);

    let player = alert_player(config.mute, &config.alert_command, &config.alert_sound);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.board_limits(),
        player,
    ));

    // Start the task lifecycle log background task
    let log_state = Arc::clone(&state);
    tokio::spawn(async move {
        lifecycle_log_task(log_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /tasks                          - Add a task");
    info!("  POST /tasks/reorder                  - Move a task");
    info!("  POST /tasks/:id/complete             - Complete a task");
    info!("  GET  /tasks/:id/timer                - Timer state");
    info!("  POST /tasks/:id/timer/menu           - Toggle the timer menu");
    info!("  POST /tasks/:id/timer/preset         - Start a preset countdown");
    info!("  POST /tasks/:id/timer/custom/submit  - Start a custom countdown");
    info!("  POST /tasks/:id/timer/toggle         - Pause or resume");
    info!("  POST /pointer-down                   - Pointer-down event");
    info!("  GET  /status                         - Board status");
    info!("  GET  /health                         - Health check");

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
