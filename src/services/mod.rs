//! External collaborators of the timer
//!
//! Audio playback for completion alerts and the global pointer-down source
//! used for outside-click dismissal.

pub mod alert;
pub mod pointer;

// Re-export main types
pub use alert::{alert_player, AlertPlayer, CommandAlertPlayer, SilentAlertPlayer};
pub use pointer::{PointerDown, PointerEvents, PointerSubscription, PointerTarget};
