//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use super::{
    board::{BoardError, BoardEvent, BoardLimits, CompletedTask, ReactionKind, Task, TaskBoard, TaskView},
    TimerSnapshot,
};
use crate::{
    services::{AlertPlayer, PointerDown, PointerEvents},
    timer::{TimerControl, TimerError},
};

/// Main application state shared by the HTTP handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    /// Active tasks, their timers and the completed feed
    pub board: Arc<Mutex<TaskBoard>>,
    /// Global pointer-down source for outside-click dismissal
    pub pointer_events: PointerEvents,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for task board change notifications
    pub board_event_tx: broadcast::Sender<BoardEvent>,
}

impl AppState {
    /// Create a new AppState with an empty task board
    pub fn new(port: u16, host: String, limits: BoardLimits, player: Arc<dyn AlertPlayer>) -> Self {
        let (board_event_tx, _) = broadcast::channel(100);
        let pointer_events = PointerEvents::default();

        Self {
            board: Arc::new(Mutex::new(TaskBoard::new(limits, player, pointer_events.clone()))),
            pointer_events,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            board_event_tx,
        }
    }

    fn lock_board(&self) -> Result<MutexGuard<'_, TaskBoard>, BoardError> {
        self.board
            .lock()
            .map_err(|e| BoardError::StatePoisoned(format!("Failed to lock task board: {}", e)))
    }

    /// Record the action and notify board listeners
    fn record(&self, action: &str, event: Option<BoardEvent>) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => error!("Failed to lock last action: {}", e),
        }
        match self.last_action_time.lock() {
            Ok(mut last_time) => *last_time = Some(Utc::now()),
            Err(e) => error!("Failed to lock last action time: {}", e),
        }

        if let Some(event) = event {
            // No subscribers is fine; the lifecycle logger may not be running
            if self.board_event_tx.send(event).is_err() {
                warn!("No listeners for board event from {}", action);
            }
        }
    }

    /// Add a task to the end of the active list
    pub fn add_task(&self, content: &str) -> Result<Task, BoardError> {
        let task = self.lock_board()?.add_task(content)?;
        self.record("add-task", Some(BoardEvent::TaskAdded { task: task.clone() }));
        Ok(task)
    }

    /// Drag a task from one position to another
    pub fn reorder_tasks(&self, from: usize, to: usize) -> Result<Vec<Task>, BoardError> {
        let tasks = self.lock_board()?.reorder(from, to)?;
        let order = tasks.iter().map(|task| task.id.clone()).collect();
        self.record("reorder", Some(BoardEvent::TasksReordered { order }));
        Ok(tasks)
    }

    /// Complete a task, tearing down its timer
    pub fn complete_task(&self, task_id: &str) -> Result<CompletedTask, BoardError> {
        let completed = self.lock_board()?.complete_task(task_id)?;
        self.record("complete-task", Some(BoardEvent::TaskCompleted { task: completed.clone() }));
        Ok(completed)
    }

    /// React to a completed task
    pub fn add_reaction(&self, task_id: &str, kind: ReactionKind) -> Result<CompletedTask, BoardError> {
        let task = self.lock_board()?.add_reaction(task_id, kind)?;
        self.record(
            "reaction",
            Some(BoardEvent::ReactionAdded { task_id: task_id.to_string(), kind }),
        );
        Ok(task)
    }

    /// Run a timer operation for one task and record it as the last action
    pub fn update_timer<F>(&self, task_id: &str, action: &str, op: F) -> Result<TimerSnapshot, BoardError>
    where
        F: FnOnce(&mut TimerControl) -> Result<TimerSnapshot, TimerError>,
    {
        let mut board = self.lock_board()?;
        let snapshot = op(board.timer_mut(task_id)?)?;
        drop(board); // Release the lock early

        self.record(action, None);
        Ok(snapshot)
    }

    /// Current timer state for one task
    pub fn get_timer(&self, task_id: &str) -> Result<TimerSnapshot, BoardError> {
        Ok(self.lock_board()?.timer(task_id)?.snapshot()?)
    }

    /// Active tasks with timers, the completed feed, and whether the list is full
    pub fn get_board(&self) -> Result<(Vec<TaskView>, Vec<CompletedTask>, bool), BoardError> {
        let board = self.lock_board()?;
        Ok((board.views()?, board.completed().to_vec(), board.is_full()))
    }

    /// Forward a pointer-down to every mounted timer
    pub fn pointer_down(&self, event: PointerDown) -> usize {
        let delivered = self.pointer_events.publish(event);
        info!("Pointer-down delivered to {} timers", delivered);
        delivered
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
