//! Background tasks module
//! 
//! This module contains the tick scheduler used by running countdowns and
//! background tasks that run alongside the HTTP server.

pub mod lifecycle_log;
pub mod ticker;

// Re-export main items
pub use lifecycle_log::lifecycle_log_task;
pub use ticker::{TickSchedule, TICK_PERIOD};
