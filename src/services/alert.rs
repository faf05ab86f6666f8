//! Audio playback for the completion alert

use std::{path::PathBuf, sync::Arc};

use futures::future::{self, BoxFuture, FutureExt};
use tokio::process::Command;
use tracing::debug;

/// Plays the alert sound once. The returned future is never awaited by
/// timer logic; its result is only logged.
pub trait AlertPlayer: Send + Sync {
    fn play(&self) -> BoxFuture<'static, Result<(), String>>;
}

/// Runs an external player command with the sound file as its argument
#[derive(Debug, Clone)]
pub struct CommandAlertPlayer {
    pub command: String,
    pub sound: PathBuf,
}

impl CommandAlertPlayer {
    pub fn new(command: impl Into<String>, sound: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            sound: sound.into(),
        }
    }
}

impl AlertPlayer for CommandAlertPlayer {
    fn play(&self) -> BoxFuture<'static, Result<(), String>> {
        let command = self.command.clone();
        let sound = self.sound.clone();

        async move {
            debug!("Playing alert {} with {}", sound.display(), command);

            let output = Command::new(&command)
                .arg(&sound)
                .output()
                .await
                .map_err(|e| format!("Failed to execute {}: {}", command, e))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(format!("{} failed: {}", command, stderr.trim()));
            }
            Ok(())
        }
        .boxed()
    }
}

/// Alert player that never makes a sound
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlertPlayer;

impl AlertPlayer for SilentAlertPlayer {
    fn play(&self) -> BoxFuture<'static, Result<(), String>> {
        future::ready(Ok(())).boxed()
    }
}

/// Pick the player for the current configuration
pub fn alert_player(muted: bool, command: &str, sound: &str) -> Arc<dyn AlertPlayer> {
    if muted {
        Arc::new(SilentAlertPlayer)
    } else {
        Arc::new(CommandAlertPlayer::new(command, sound))
    }
}
