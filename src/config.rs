//! Configuration and CLI argument handling

use clap::Parser;

use crate::{state::BoardLimits, timer::menu::DEFAULT_MAX_CUSTOM_MINUTES};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "task-timers")]
#[command(about = "A local task list daemon with per-task countdown timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Maximum number of active tasks
    #[arg(long, default_value = "3")]
    pub max_tasks: usize,

    /// Longest custom countdown in minutes
    #[arg(long, default_value_t = DEFAULT_MAX_CUSTOM_MINUTES)]
    pub max_custom_minutes: u64,

    /// Command used to play the completion alert
    #[arg(long, default_value = "paplay")]
    pub alert_command: String,

    /// Sound file passed to the alert command
    #[arg(long, default_value = "/usr/share/sounds/freedesktop/stereo/complete.oga")]
    pub alert_sound: String,

    /// Never play the completion alert
    #[arg(long)]
    pub mute: bool,

    /// Name recorded on completed tasks
    #[arg(long, default_value = "Current User")]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Task board limits derived from the flags
    pub fn board_limits(&self) -> BoardLimits {
        BoardLimits {
            max_tasks: self.max_tasks,
            max_custom_minutes: self.max_custom_minutes,
            completed_by: self.user.clone(),
        }
    }
}
