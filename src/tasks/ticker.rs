//! Cancellable recurring tick task

use std::{ops::ControlFlow, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Period of a countdown tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A recurring callback running on its own tokio task.
///
/// The first call happens one period after scheduling. The task ends when
/// the callback breaks or the schedule is cancelled or dropped.
#[derive(Debug)]
pub struct TickSchedule {
    handle: JoinHandle<()>,
}

impl TickSchedule {
    pub fn every<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if callback().is_break() {
                    debug!("Tick schedule finished");
                    break;
                }
            }
        });

        Self { handle }
    }

    /// Stop further callbacks
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickSchedule {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
