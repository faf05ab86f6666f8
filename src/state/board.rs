//! Active task list and completed-task feed

use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::TimerSnapshot;
use crate::{
    services::{AlertPlayer, PointerEvents},
    timer::{TimerControl, TimerError},
};

/// Errors from task board operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("task content is empty")]
    EmptyContent,
    #[error("task list is full ({max} active tasks)")]
    BoardFull { max: usize },
    #[error("no active task with id {0}")]
    TaskNotFound(String),
    #[error("position {index} is outside the task list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no completed task with id {0}")]
    CompletedTaskNotFound(String),
    #[error("unknown reaction {0:?}")]
    UnknownReaction(String),
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error("task board unavailable: {0}")]
    StatePoisoned(String),
}

/// An active task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    pub hearts: u64,
    pub celebrations: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Hearts,
    Celebrations,
}

impl FromStr for ReactionKind {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hearts" => Ok(Self::Hearts),
            "celebrations" => Ok(Self::Celebrations),
            other => Err(BoardError::UnknownReaction(other.to_string())),
        }
    }
}

/// A finished task in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub content: String,
    pub completed_at: DateTime<Utc>,
    pub completed_by: String,
    pub reactions: Reactions,
}

/// Task board change notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    TaskAdded { task: Task },
    TasksReordered { order: Vec<String> },
    TaskCompleted { task: CompletedTask },
    ReactionAdded { task_id: String, kind: ReactionKind },
}

/// Active task together with its timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: String,
    pub content: String,
    pub timer: TimerSnapshot,
}

/// Board limits and identity
#[derive(Debug, Clone)]
pub struct BoardLimits {
    pub max_tasks: usize,
    pub max_custom_minutes: u64,
    pub completed_by: String,
}

#[derive(Debug)]
struct ActiveTask {
    task: Task,
    timer: TimerControl,
}

/// Ordered active tasks (each with a mounted timer) and the completed feed
pub struct TaskBoard {
    active: Vec<ActiveTask>,
    completed: Vec<CompletedTask>,
    limits: BoardLimits,
    player: Arc<dyn AlertPlayer>,
    pointer_events: PointerEvents,
}

impl TaskBoard {
    pub fn new(limits: BoardLimits, player: Arc<dyn AlertPlayer>, pointer_events: PointerEvents) -> Self {
        Self {
            active: Vec::new(),
            completed: Vec::new(),
            limits,
            player,
            pointer_events,
        }
    }

    /// Append a task and mount its timer
    pub fn add_task(&mut self, content: &str) -> Result<Task, BoardError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BoardError::EmptyContent);
        }
        if self.active.len() >= self.limits.max_tasks {
            return Err(BoardError::BoardFull { max: self.limits.max_tasks });
        }

        let task = Task {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
        };
        let timer = TimerControl::mount(
            task.id.clone(),
            Arc::clone(&self.player),
            &self.pointer_events,
            self.limits.max_custom_minutes,
        );
        info!("Added task {}", task.id);
        self.active.push(ActiveTask { task: task.clone(), timer });
        Ok(task)
    }

    /// Move the task at `from` to position `to`
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<Vec<Task>, BoardError> {
        let len = self.active.len();
        for index in [from, to] {
            if index >= len {
                return Err(BoardError::IndexOutOfRange { index, len });
            }
        }
        let moved = self.active.remove(from);
        self.active.insert(to, moved);
        Ok(self.tasks())
    }

    /// Remove an active task, unmount its timer and add it to the feed
    pub fn complete_task(&mut self, task_id: &str) -> Result<CompletedTask, BoardError> {
        let index = self.position(task_id)?;
        let ActiveTask { task, timer } = self.active.remove(index);
        drop(timer);

        let completed = CompletedTask {
            id: task.id,
            content: task.content,
            completed_at: Utc::now(),
            completed_by: self.limits.completed_by.clone(),
            reactions: Reactions::default(),
        };
        info!("Completed task {}", completed.id);
        self.completed.insert(0, completed.clone());
        Ok(completed)
    }

    /// Count one reaction on a completed task
    pub fn add_reaction(&mut self, task_id: &str, kind: ReactionKind) -> Result<CompletedTask, BoardError> {
        let task = self
            .completed
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| BoardError::CompletedTaskNotFound(task_id.to_string()))?;
        match kind {
            ReactionKind::Hearts => task.reactions.hearts += 1,
            ReactionKind::Celebrations => task.reactions.celebrations += 1,
        }
        Ok(task.clone())
    }

    pub fn timer(&self, task_id: &str) -> Result<&TimerControl, BoardError> {
        let index = self.position(task_id)?;
        Ok(&self.active[index].timer)
    }

    pub fn timer_mut(&mut self, task_id: &str) -> Result<&mut TimerControl, BoardError> {
        let index = self.position(task_id)?;
        Ok(&mut self.active[index].timer)
    }

    /// Active tasks in display order
    pub fn tasks(&self) -> Vec<Task> {
        self.active.iter().map(|entry| entry.task.clone()).collect()
    }

    /// Active tasks with their timer state
    pub fn views(&self) -> Result<Vec<TaskView>, BoardError> {
        self.active
            .iter()
            .map(|entry| {
                Ok(TaskView {
                    id: entry.task.id.clone(),
                    content: entry.task.content.clone(),
                    timer: entry.timer.snapshot()?,
                })
            })
            .collect()
    }

    /// Completed tasks, newest first
    pub fn completed(&self) -> &[CompletedTask] {
        &self.completed
    }

    pub fn is_full(&self) -> bool {
        self.active.len() >= self.limits.max_tasks
    }

    fn position(&self, task_id: &str) -> Result<usize, BoardError> {
        self.active
            .iter()
            .position(|entry| entry.task.id == task_id)
            .ok_or_else(|| BoardError::TaskNotFound(task_id.to_string()))
    }
}

impl std::fmt::Debug for TaskBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskBoard")
            .field("active", &self.active)
            .field("completed", &self.completed)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
