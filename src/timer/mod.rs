//! Per-task countdown timer
//!
//! A [`TimerControl`] composes the countdown engine, the configuration menu
//! and the completion signal for one task row.

pub mod control;
pub mod engine;
pub mod menu;
pub mod signal;

use thiserror::Error;

pub use control::TimerControl;
pub use engine::{format_time, CountdownEngine, TickOutcome};
pub use menu::{
    find_preset, parse_custom_minutes, ConfigMenu, CustomDurationError, PresetDuration, PRESETS,
};
pub use signal::CompletionSignal;

/// Errors from timer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("countdown duration must be at least one second")]
    ZeroDuration,
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
    #[error(transparent)]
    InvalidCustomDuration(#[from] CustomDurationError),
    #[error("timer state unavailable: {0}")]
    StatePoisoned(String),
}
