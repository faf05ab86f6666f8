//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    services::PointerDown,
    state::{AppState, BoardError, CompletedTask, ReactionKind, Task, TimerSnapshot},
    timer::{TimerControl, TimerError},
};
use super::responses::{
    AddTaskRequest, ApiResponse, CustomTextRequest, ErrorResponse, HealthResponse, PointerDelivery,
    PresetRequest, ReorderRequest, StatusResponse, SubmitCustomRequest,
};

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// HTTP status for a failed board or timer operation
pub fn error_status(error: &BoardError) -> StatusCode {
    match error {
        BoardError::EmptyContent
        | BoardError::IndexOutOfRange { .. }
        | BoardError::UnknownReaction(_)
        | BoardError::Timer(TimerError::ZeroDuration)
        | BoardError::Timer(TimerError::UnknownPreset(_)) => StatusCode::BAD_REQUEST,
        BoardError::Timer(TimerError::InvalidCustomDuration(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        BoardError::BoardFull { .. } => StatusCode::CONFLICT,
        BoardError::TaskNotFound(_) | BoardError::CompletedTaskNotFound(_) => StatusCode::NOT_FOUND,
        BoardError::Timer(TimerError::StatePoisoned(_)) | BoardError::StatePoisoned(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Build the error response, attaching the timer when one was involved
fn reject(state: &AppState, task_id: Option<&str>, error: BoardError) -> ApiError {
    let status = error_status(&error);
    if status.is_server_error() {
        error!("Request failed: {}", error);
    } else {
        warn!("Request rejected: {}", error);
    }

    let timer = match (&error, task_id) {
        (BoardError::Timer(_), Some(task_id)) => state.get_timer(task_id).ok(),
        _ => None,
    };
    (status, Json(ErrorResponse::new(error.to_string(), timer)))
}

fn timer_action<F>(state: &AppState, task_id: &str, action: &str, op: F) -> ApiResult<TimerSnapshot>
where
    F: FnOnce(&mut TimerControl) -> Result<TimerSnapshot, TimerError>,
{
    match state.update_timer(task_id, action, op) {
        Ok(snapshot) => {
            info!("Timer {} for task {}", action, task_id);
            Ok(Json(ApiResponse::ok(format!("Timer {}", action), snapshot)))
        }
        Err(e) => Err(reject(state, Some(task_id), e)),
    }
}

/// Handle POST /tasks - Add a task
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddTaskRequest>,
) -> ApiResult<Task> {
    match state.add_task(&request.content) {
        Ok(task) => Ok(Json(ApiResponse::ok("Task added".to_string(), task))),
        Err(e) => Err(reject(&state, None, e)),
    }
}

/// Handle POST /tasks/reorder - Move a task to a new position
pub async fn reorder_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> ApiResult<Vec<Task>> {
    match state.reorder_tasks(request.from, request.to) {
        Ok(tasks) => Ok(Json(ApiResponse::ok("Tasks reordered".to_string(), tasks))),
        Err(e) => Err(reject(&state, None, e)),
    }
}

/// Handle POST /tasks/:id/complete - Complete a task
pub async fn complete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<CompletedTask> {
    match state.complete_task(&task_id) {
        Ok(task) => Ok(Json(ApiResponse::ok("Task completed".to_string(), task))),
        Err(e) => Err(reject(&state, None, e)),
    }
}

/// Handle POST /completed/:id/reactions/:kind - React to a completed task
pub async fn reaction_handler(
    State(state): State<Arc<AppState>>,
    Path((task_id, kind)): Path<(String, String)>,
) -> ApiResult<CompletedTask> {
    let result = kind
        .parse::<ReactionKind>()
        .and_then(|kind| state.add_reaction(&task_id, kind));
    match result {
        Ok(task) => Ok(Json(ApiResponse::ok("Reaction added".to_string(), task))),
        Err(e) => Err(reject(&state, None, e)),
    }
}

/// Handle GET /tasks/:id/timer - Current timer state
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<TimerSnapshot> {
    match state.get_timer(&task_id) {
        Ok(snapshot) => Ok(Json(ApiResponse::ok("Timer state".to_string(), snapshot))),
        Err(e) => Err(reject(&state, None, e)),
    }
}

/// Handle POST /tasks/:id/timer/menu - Clock button click
pub async fn toggle_menu_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "menu toggled", |timer| timer.toggle_menu())
}

/// Handle POST /tasks/:id/timer/menu/close - Close the menu
pub async fn close_menu_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "menu closed", |timer| timer.close_menu())
}

/// Handle POST /tasks/:id/timer/preset - Start a preset countdown
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(request): Json<PresetRequest>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "preset started", |timer| {
        timer.select_preset(&request.label)
    })
}

/// Handle POST /tasks/:id/timer/custom - Show the custom duration form
pub async fn open_custom_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "custom form opened", |timer| {
        timer.open_custom_input()
    })
}

/// Handle PUT /tasks/:id/timer/custom - Edit the custom duration field
pub async fn custom_text_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(request): Json<CustomTextRequest>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "custom text edited", |timer| {
        timer.set_custom_text(&request.text)
    })
}

/// Handle POST /tasks/:id/timer/custom/submit - Start a custom countdown
pub async fn submit_custom_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(request): Json<SubmitCustomRequest>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "custom duration started", |timer| {
        timer.submit_custom_input(request.text.as_deref())
    })
}

/// Handle POST /tasks/:id/timer/toggle - Pause or resume
pub async fn toggle_running_handler(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<TimerSnapshot> {
    timer_action(&state, &task_id, "toggled", |timer| timer.toggle_running())
}

/// Handle POST /pointer-down - Global pointer-down event
pub async fn pointer_down_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PointerDown>,
) -> Json<ApiResponse<PointerDelivery>> {
    let listeners = state.pointer_down(event);
    Json(ApiResponse::ok(
        "Pointer event delivered".to_string(),
        PointerDelivery { listeners },
    ))
}

/// Handle GET /status - Return the board and server status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (tasks, completed, board_full) = match state.get_board() {
        Ok(board) => board,
        Err(e) => return Err(reject(&state, None, e)),
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        tasks,
        completed,
        board_full,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::CustomDurationError;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_status(&BoardError::EmptyContent), StatusCode::BAD_REQUEST);
        assert_eq!(error_status(&BoardError::BoardFull { max: 3 }), StatusCode::CONFLICT);
        assert_eq!(
            error_status(&BoardError::TaskNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&BoardError::Timer(TimerError::InvalidCustomDuration(
                CustomDurationError::NotPositive
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&BoardError::StatePoisoned("poisoned".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
