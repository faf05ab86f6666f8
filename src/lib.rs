//! Task Timers - A local task list daemon with per-task countdown timers
//! 
//! This library provides a small task board (capped active list, completed
//! feed with reactions) where every active task owns a countdown timer with
//! a preset/custom configuration menu and an audible completion alert.

pub mod config;
pub mod state;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use timer::TimerControl;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
