//! Task lifecycle logging background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::state::{AppState, BoardEvent};

/// Background task that logs every task board change
pub async fn lifecycle_log_task(state: Arc<AppState>) {
    info!("Starting task lifecycle log task");

    let mut event_rx = state.board_event_tx.subscribe();
    drop(state);

    loop {
        match event_rx.recv().await {
            Ok(event) => info!("{}", describe_event(&event)),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Lifecycle log fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Task lifecycle log task stopped");
}

/// One-line description of a board event
pub fn describe_event(event: &BoardEvent) -> String {
    match event {
        BoardEvent::TaskAdded { task } => format!("Task added: {} ({:?})", task.id, task.content),
        BoardEvent::TasksReordered { order } => format!("Tasks reordered: {}", order.join(", ")),
        BoardEvent::TaskCompleted { task } => format!(
            "Task completed: {} by {} at {}",
            task.id,
            task.completed_by,
            task.completed_at.to_rfc3339()
        ),
        BoardEvent::ReactionAdded { task_id, kind } => {
            format!("Reaction {:?} added to {}", kind, task_id)
        }
    }
}
