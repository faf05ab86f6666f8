//! State management module
//! 
//! This module contains the task board, the shared application state and
//! the serializable timer view.

pub mod app_state;
pub mod board;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use board::{
    BoardError, BoardEvent, BoardLimits, CompletedTask, ReactionKind, Reactions, Task, TaskBoard,
    TaskView,
};
pub use timer_state::TimerSnapshot;
