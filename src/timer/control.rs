//! Timer control: composes engine, menu and completion signal for one task

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, error, info};

use super::{
    engine::{CountdownEngine, TickOutcome},
    find_preset, parse_custom_minutes,
    menu::ConfigMenu,
    signal::CompletionSignal,
    TimerError, PRESETS,
};
use crate::{
    services::{AlertPlayer, PointerEvents, PointerSubscription},
    state::TimerSnapshot,
    tasks::{TickSchedule, TICK_PERIOD},
};

/// Mutable state shared with the tick and pointer tasks
#[derive(Debug, Default)]
struct TimerCore {
    engine: CountdownEngine,
    menu: ConfigMenu,
    /// Bumped on every start, pause and resume; ticks from an older
    /// schedule are ignored
    generation: u64,
}

/// One task's countdown timer, its menu and its completion alert.
///
/// Mounting registers an outside-click listener and dropping the control
/// cancels any pending tick and removes that listener.
#[derive(Debug)]
pub struct TimerControl {
    task_id: String,
    core: Arc<Mutex<TimerCore>>,
    signal: CompletionSignal,
    max_custom_minutes: u64,
    ticker: Option<TickSchedule>,
    _pointer: PointerSubscription,
}

impl TimerControl {
    /// Create the timer for a newly shown task row
    pub fn mount(
        task_id: impl Into<String>,
        player: Arc<dyn AlertPlayer>,
        pointer_events: &PointerEvents,
        max_custom_minutes: u64,
    ) -> Self {
        let task_id = task_id.into();
        let core = Arc::new(Mutex::new(TimerCore::default()));

        let listener_core = Arc::clone(&core);
        let listener_task = task_id.clone();
        let pointer = pointer_events.subscribe_scoped(task_id.clone(), move |event| {
            if event.target.belongs_to(&listener_task) {
                return;
            }
            match listener_core.lock() {
                Ok(mut core) if core.menu.is_open() => {
                    core.menu.close();
                    debug!("Outside click closed timer menu for task {}", listener_task);
                }
                Ok(_) => {}
                Err(e) => error!("Failed to lock timer for task {}: {}", listener_task, e),
            }
        });

        debug!("Mounted timer for task {}", task_id);
        Self {
            task_id,
            core,
            signal: CompletionSignal::new(player),
            max_custom_minutes,
            ticker: None,
            _pointer: pointer,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimerCore>, TimerError> {
        self.core
            .lock()
            .map_err(|e| TimerError::StatePoisoned(format!("Failed to lock timer state: {}", e)))
    }

    /// Current state for display
    pub fn snapshot(&self) -> Result<TimerSnapshot, TimerError> {
        let core = self.lock()?;
        Ok(TimerSnapshot {
            task_id: self.task_id.clone(),
            remaining_seconds: core.engine.remaining_seconds(),
            is_running: core.engine.is_running(),
            display: core.engine.display(),
            menu_open: core.menu.is_open(),
            custom_input_open: core.menu.custom_input_open(),
            custom_input_text: core.menu.custom_input_text().to_string(),
            input_focused: core.menu.input_focused(),
            completions: self.signal.fired_count(),
            presets: PRESETS.to_vec(),
        })
    }

    /// Replace any countdown with a fresh one of `duration_seconds`
    pub fn start(&mut self, duration_seconds: u64) -> Result<TimerSnapshot, TimerError> {
        let generation = {
            let mut core = self.lock()?;
            core.engine.start(duration_seconds)?;
            core.generation += 1;
            core.generation
        };
        info!("Started {}s countdown for task {}", duration_seconds, self.task_id);
        self.schedule_ticks(generation);
        self.snapshot()
    }

    /// Pause a running countdown or resume a paused one
    pub fn toggle_running(&mut self) -> Result<TimerSnapshot, TimerError> {
        let (running, generation) = {
            let mut core = self.lock()?;
            let was_running = core.engine.is_running();
            let running = core.engine.toggle_running();
            if running != was_running {
                core.generation += 1;
            }
            (running, core.generation)
        };

        if running {
            info!("Resumed countdown for task {}", self.task_id);
            self.schedule_ticks(generation);
        } else {
            debug!("Countdown for task {} is paused", self.task_id);
            self.cancel_ticks();
        }
        self.snapshot()
    }

    /// Trigger button click
    pub fn toggle_menu(&mut self) -> Result<TimerSnapshot, TimerError> {
        let open = self.lock()?.menu.toggle();
        debug!("Timer menu for task {} open={}", self.task_id, open);
        self.snapshot()
    }

    pub fn open_menu(&mut self) -> Result<TimerSnapshot, TimerError> {
        self.lock()?.menu.open();
        self.snapshot()
    }

    pub fn close_menu(&mut self) -> Result<TimerSnapshot, TimerError> {
        self.lock()?.menu.close();
        self.snapshot()
    }

    /// Start the preset named `label` and close the menu
    pub fn select_preset(&mut self, label: &str) -> Result<TimerSnapshot, TimerError> {
        let preset = find_preset(label).ok_or_else(|| TimerError::UnknownPreset(label.to_string()))?;
        self.start(preset.seconds)?;
        self.close_menu()
    }

    /// Show the custom-minutes form with its field focused
    pub fn open_custom_input(&mut self) -> Result<TimerSnapshot, TimerError> {
        if self.lock()?.menu.open_custom_input() {
            debug!("Custom duration form opened for task {}", self.task_id);
        }
        self.snapshot()
    }

    /// Edit the raw text of the custom field
    pub fn set_custom_text(&mut self, text: &str) -> Result<TimerSnapshot, TimerError> {
        self.lock()?.menu.set_custom_text(text);
        self.snapshot()
    }

    /// Start a countdown of the given (or currently typed) number of minutes.
    ///
    /// Rejected input leaves the menu and any running countdown untouched.
    pub fn submit_custom_input(&mut self, text: Option<&str>) -> Result<TimerSnapshot, TimerError> {
        let typed = {
            let mut core = self.lock()?;
            match text {
                Some(text) => {
                    core.menu.set_custom_text(text);
                    text.to_string()
                }
                None => core.menu.custom_input_text().to_string(),
            }
        };

        let minutes = parse_custom_minutes(&typed, self.max_custom_minutes).map_err(|e| {
            debug!("Rejected custom duration for task {}: {}", self.task_id, e);
            e
        })?;
        self.start(minutes.saturating_mul(60))?;
        self.close_menu()
    }

    fn schedule_ticks(&mut self, generation: u64) {
        let core = Arc::clone(&self.core);
        let signal = self.signal.clone();
        let task_id = self.task_id.clone();

        // Replacing the handle cancels the previous schedule
        self.ticker = Some(TickSchedule::every(TICK_PERIOD, move || {
            let outcome = match core.lock() {
                Ok(mut core) if core.generation == generation => core.engine.tick(),
                Ok(_) => return ControlFlow::Break(()),
                Err(e) => {
                    error!("Failed to lock timer for task {}: {}", task_id, e);
                    return ControlFlow::Break(());
                }
            };

            match outcome {
                TickOutcome::Ticked { remaining_seconds } => {
                    debug!("Task {} countdown at {}s", task_id, remaining_seconds);
                    ControlFlow::Continue(())
                }
                TickOutcome::Completed => {
                    signal.fire(&task_id);
                    ControlFlow::Break(())
                }
                TickOutcome::Idle => ControlFlow::Break(()),
            }
        }));
    }

    fn cancel_ticks(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

impl Drop for TimerControl {
    fn drop(&mut self) {
        self.cancel_ticks();
        debug!("Unmounted timer for task {}", self.task_id);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::{self, BoxFuture, FutureExt};
    use tokio::time::sleep;

    use super::*;
    use crate::services::{PointerDown, PointerTarget, SilentAlertPlayer};
    use crate::timer::CustomDurationError;

    struct BlockedPlayer;

    impl AlertPlayer for BlockedPlayer {
        fn play(&self) -> BoxFuture<'static, Result<(), String>> {
            future::ready(Err("autoplay blocked".to_string())).boxed()
        }
    }

    fn mount(events: &PointerEvents) -> TimerControl {
        TimerControl::mount("task-1", Arc::new(SilentAlertPlayer), events, 180)
    }

    // Half-second offsets keep assertions clear of tick boundaries
    async fn after_ticks(ticks: u64) {
        sleep(Duration::from_millis(ticks * 1_000 + 500)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_mounted_timer_is_unconfigured() {
        let events = PointerEvents::default();
        let timer = mount(&events);
        assert_eq!(timer.snapshot().unwrap(), TimerSnapshot::unconfigured("task-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_preset_counts_down() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.open_menu().unwrap();

        let snapshot = timer.select_preset("15m").unwrap();
        assert_eq!(snapshot.display.as_deref(), Some("15:00"));
        assert!(!snapshot.menu_open);

        after_ticks(61).await;
        let snapshot = timer.snapshot().unwrap();
        assert_eq!(snapshot.display.as_deref(), Some("13:59"));
        assert!(snapshot.is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_preset_rejected() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        assert_eq!(
            timer.select_preset("5m"),
            Err(TimerError::UnknownPreset("5m".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_completes_once() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.start(5).unwrap();

        after_ticks(5).await;
        let snapshot = timer.snapshot().unwrap();
        assert_eq!(snapshot.remaining_seconds, Some(0));
        assert_eq!(snapshot.display.as_deref(), Some("0:00"));
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.completions, 1);

        after_ticks(3).await;
        assert_eq!(timer.snapshot().unwrap(), snapshot);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_fires_on_reaching_zero() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.start(2).unwrap();

        after_ticks(1).await;
        assert_eq!(timer.snapshot().unwrap().completions, 0);
        after_ticks(1).await;
        assert_eq!(timer.snapshot().unwrap().completions, 1);
        after_ticks(1).await;
        assert_eq!(timer.snapshot().unwrap().completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_audio_still_stops_timer() {
        let events = PointerEvents::default();
        let mut timer = TimerControl::mount("task-1", Arc::new(BlockedPlayer), &events, 180);
        timer.start(1).unwrap();

        after_ticks(1).await;
        let snapshot = timer.snapshot().unwrap();
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_countdown() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.start(60).unwrap();

        after_ticks(10).await;
        let paused = timer.toggle_running().unwrap();
        assert!(!paused.is_running);
        assert_eq!(paused.remaining_seconds, Some(50));

        after_ticks(30).await;
        assert_eq!(timer.snapshot().unwrap().remaining_seconds, Some(50));

        let resumed = timer.toggle_running().unwrap();
        assert!(resumed.is_running);
        after_ticks(5).await;
        assert_eq!(timer.snapshot().unwrap().remaining_seconds, Some(45));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_toggle_keeps_remaining() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.start(120).unwrap();

        timer.toggle_running().unwrap();
        let snapshot = timer.toggle_running().unwrap();
        assert!(snapshot.is_running);
        assert_eq!(snapshot.remaining_seconds, Some(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_before_start_is_noop() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        let snapshot = timer.toggle_running().unwrap();
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.remaining_seconds, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_running_countdown() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.start(600).unwrap();
        after_ticks(3).await;

        timer.start(30).unwrap();
        after_ticks(2).await;
        // Only the new schedule ticks
        assert_eq!(timer.snapshot().unwrap().remaining_seconds, Some(28));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_submission_starts_countdown() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);

        for minutes in [1u64, 25, 90, 180] {
            timer.open_menu().unwrap();
            timer.open_custom_input().unwrap();
            let snapshot = timer.submit_custom_input(Some(&minutes.to_string())).unwrap();
            assert_eq!(snapshot.remaining_seconds, Some(minutes * 60));
            assert!(snapshot.is_running);
            assert!(!snapshot.menu_open);
            assert_eq!(snapshot.custom_input_text, "");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_submission_uses_typed_text() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.open_menu().unwrap();
        timer.open_custom_input().unwrap();
        timer.set_custom_text("3").unwrap();

        let snapshot = timer.submit_custom_input(None).unwrap();
        assert_eq!(snapshot.remaining_seconds, Some(180));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_submission_reads_leading_integer() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);

        for (text, seconds) in [("1.5", 60), ("12abc", 720)] {
            timer.open_menu().unwrap();
            timer.open_custom_input().unwrap();
            let snapshot = timer.submit_custom_input(Some(text)).unwrap();
            assert_eq!(snapshot.remaining_seconds, Some(seconds));
            assert!(snapshot.is_running);
            assert!(!snapshot.menu_open);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_custom_submission_changes_nothing() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.start(300).unwrap();
        timer.open_menu().unwrap();
        timer.open_custom_input().unwrap();

        for text in ["", "0", "-3", "ten", "181"] {
            let before = timer.snapshot().unwrap();
            let result = timer.submit_custom_input(Some(text));
            assert!(matches!(result, Err(TimerError::InvalidCustomDuration(_))));

            let after = timer.snapshot().unwrap();
            assert_eq!(after.remaining_seconds, before.remaining_seconds);
            assert_eq!(after.is_running, before.is_running);
            assert!(after.menu_open);
            assert!(after.custom_input_open);
            assert_eq!(after.custom_input_text, text);
        }

        assert_eq!(
            timer.submit_custom_input(Some("")),
            Err(TimerError::InvalidCustomDuration(CustomDurationError::Empty))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_custom_input_focuses_field() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.toggle_menu().unwrap();
        let snapshot = timer.open_custom_input().unwrap();
        assert!(snapshot.custom_input_open);
        assert!(snapshot.input_focused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_click_closes_menu() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.open_menu().unwrap();
        timer.open_custom_input().unwrap();
        timer.set_custom_text("12").unwrap();

        // Handled before publish returns
        assert_eq!(events.publish(PointerDown { target: PointerTarget::Elsewhere }), 1);

        let snapshot = timer.snapshot().unwrap();
        assert!(!snapshot.menu_open);
        assert!(!snapshot.custom_input_open);
        assert_eq!(snapshot.custom_input_text, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clicks_on_own_control_keep_menu_open() {
        let events = PointerEvents::default();
        let mut timer = mount(&events);
        timer.open_menu().unwrap();

        events.publish(PointerDown {
            target: PointerTarget::TimerMenu { task_id: "task-1".into() },
        });
        events.publish(PointerDown {
            target: PointerTarget::TimerTrigger { task_id: "task-1".into() },
        });
        assert!(timer.snapshot().unwrap().menu_open);

        // Another row's menu counts as outside
        events.publish(PointerDown {
            target: PointerTarget::TimerMenu { task_id: "task-2".into() },
        });
        assert!(!timer.snapshot().unwrap().menu_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_releases_listener_and_ticks() {
        let events = PointerEvents::default();
        let mut first = mount(&events);
        let second = TimerControl::mount("task-2", Arc::new(SilentAlertPlayer), &events, 180);
        assert_eq!(events.listener_count(), 2);

        first.start(10).unwrap();
        let core = Arc::clone(&first.core);
        drop(first);
        assert_eq!(events.listener_count(), 1);

        after_ticks(3).await;
        let remaining = core.lock().unwrap().engine.remaining_seconds();
        assert_eq!(remaining, Some(10));

        drop(second);
        assert_eq!(events.listener_count(), 0);
    }
}
