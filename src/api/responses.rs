//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{CompletedTask, TaskView, TimerSnapshot};

/// Successful response wrapping the affected data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create an ok response
    pub fn ok(message: String, data: T) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            data,
        }
    }
}

/// Error body. Rejected timer operations carry the unchanged timer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerSnapshot>,
}

impl ErrorResponse {
    pub fn new(message: String, timer: Option<TimerSnapshot>) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Full board status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub tasks: Vec<TaskView>,
    pub completed: Vec<CompletedTask>,
    pub board_full: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetRequest {
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomTextRequest {
    pub text: String,
}

/// Custom submission; without `text` the typed field is used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitCustomRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerDelivery {
    pub listeners: usize,
}
