//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", post(add_task_handler))
        .route("/tasks/reorder", post(reorder_handler))
        .route("/tasks/:task_id/complete", post(complete_task_handler))
        // Timer control for one task row
        .route("/tasks/:task_id/timer", get(get_timer_handler))
        .route("/tasks/:task_id/timer/menu", post(toggle_menu_handler))
        .route("/tasks/:task_id/timer/menu/close", post(close_menu_handler))
        .route("/tasks/:task_id/timer/preset", post(preset_handler))
        .route(
            "/tasks/:task_id/timer/custom",
            post(open_custom_handler).put(custom_text_handler),
        )
        .route("/tasks/:task_id/timer/custom/submit", post(submit_custom_handler))
        .route("/tasks/:task_id/timer/toggle", post(toggle_running_handler))
        .route("/pointer-down", post(pointer_down_handler))
        .route("/completed/:task_id/reactions/:kind", post(reaction_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
