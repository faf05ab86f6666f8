//! Completion signal: one audible alert per finished countdown

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::services::AlertPlayer;

/// Best-effort notification fired when a countdown reaches zero
#[derive(Clone)]
pub struct CompletionSignal {
    player: Arc<dyn AlertPlayer>,
    fired: Arc<AtomicU64>,
}

impl CompletionSignal {
    pub fn new(player: Arc<dyn AlertPlayer>) -> Self {
        Self {
            player,
            fired: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record the completion and start playback without waiting for it
    pub fn fire(&self, task_id: &str) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        info!("Countdown finished for task {}", task_id);

        let playback = self.player.play();
        let task_id = task_id.to_string();
        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    match playback.await {
                        Ok(()) => debug!("Alert played for task {}", task_id),
                        Err(e) => warn!("Alert playback failed for task {}: {}", task_id, e),
                    }
                });
            }
            Err(e) => warn!("No runtime to play alert for task {}: {}", task_id, e),
        }
    }

    /// How many times this signal has fired
    pub fn fired_count(&self) -> u64 {
        self.fired.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("fired", &self.fired_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use futures::future::{self, BoxFuture, FutureExt};

    use super::*;

    struct FailingPlayer;

    impl AlertPlayer for FailingPlayer {
        fn play(&self) -> BoxFuture<'static, Result<(), String>> {
            future::ready(Err("autoplay blocked".to_string())).boxed()
        }
    }

    #[tokio::test]
    async fn test_playback_failure_is_swallowed() {
        let signal = CompletionSignal::new(Arc::new(FailingPlayer));
        signal.fire("task-1");
        tokio::task::yield_now().await;
        assert_eq!(signal.fired_count(), 1);
    }

    #[test]
    fn test_fire_without_runtime_still_counts() {
        let signal = CompletionSignal::new(Arc::new(FailingPlayer));
        signal.fire("task-1");
        assert_eq!(signal.fired_count(), 1);
    }
}
