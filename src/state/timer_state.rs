//! Serializable view of one task's timer

use serde::Serialize;

use crate::timer::{PresetDuration, PRESETS};

/// Timer state as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub task_id: String,
    /// `None` until a duration has been chosen
    pub remaining_seconds: Option<u64>,
    pub is_running: bool,
    /// Remaining time as `M:SS`
    pub display: Option<String>,
    pub menu_open: bool,
    pub custom_input_open: bool,
    pub custom_input_text: String,
    pub input_focused: bool,
    /// Number of countdowns that ran to zero
    pub completions: u64,
    pub presets: Vec<PresetDuration>,
}

impl TimerSnapshot {
    /// Snapshot of a freshly mounted timer
    pub fn unconfigured(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            remaining_seconds: None,
            is_running: false,
            display: None,
            menu_open: false,
            custom_input_open: false,
            custom_input_text: String::new(),
            input_focused: false,
            completions: 0,
            presets: PRESETS.to_vec(),
        }
    }
}
