//! Countdown engine: remaining seconds and the running flag

use tracing::debug;

use super::TimerError;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stray tick: nothing was running or nothing was left to count
    Idle,
    /// One second elapsed, the countdown keeps going
    Ticked { remaining_seconds: u64 },
    /// This tick reached zero; the engine has stopped
    Completed,
}

/// Remaining time and running state for one task's countdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownEngine {
    remaining_seconds: Option<u64>,
    is_running: bool,
}

impl CountdownEngine {
    /// Create an engine that has never been configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous countdown and start running from `duration_seconds`
    pub fn start(&mut self, duration_seconds: u64) -> Result<(), TimerError> {
        if duration_seconds == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.remaining_seconds = Some(duration_seconds);
        self.is_running = true;
        Ok(())
    }

    /// Flip between running and paused, returning the new running state.
    ///
    /// Does nothing before the first `start`. A countdown that already
    /// reached zero cannot be resumed.
    pub fn toggle_running(&mut self) -> bool {
        match self.remaining_seconds {
            None => {}
            Some(_) if self.is_running => self.is_running = false,
            Some(0) => debug!("Ignoring resume of a finished countdown"),
            Some(_) => self.is_running = true,
        }
        self.is_running
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        match self.remaining_seconds {
            None | Some(0) => TickOutcome::Idle,
            Some(remaining) => {
                let next = remaining.saturating_sub(1);
                self.remaining_seconds = Some(next);
                if next == 0 {
                    self.is_running = false;
                    TickOutcome::Completed
                } else {
                    TickOutcome::Ticked { remaining_seconds: next }
                }
            }
        }
    }

    /// Seconds left, or `None` before the first `start`
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.remaining_seconds
    }

    /// Whether ticks currently decrement the countdown
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Remaining time as `M:SS`, or `None` before the first `start`
    pub fn display(&self) -> Option<String> {
        self.remaining_seconds.map(format_time)
    }
}

/// Format seconds as `M:SS` with unbounded minutes and no hours component
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_is_unconfigured() {
        let engine = CountdownEngine::new();
        assert_eq!(engine.remaining_seconds(), None);
        assert!(!engine.is_running());
        assert_eq!(engine.display(), None);
    }

    #[test]
    fn test_start_replaces_previous_countdown() {
        let mut engine = CountdownEngine::new();
        engine.start(900).unwrap();
        engine.tick();
        engine.tick();
        engine.start(60).unwrap();
        assert_eq!(engine.remaining_seconds(), Some(60));
        assert!(engine.is_running());
    }

    #[test]
    fn test_start_rejects_zero() {
        let mut engine = CountdownEngine::new();
        assert_eq!(engine.start(0), Err(TimerError::ZeroDuration));
        assert_eq!(engine.remaining_seconds(), None);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_toggle_without_duration_is_noop() {
        let mut engine = CountdownEngine::new();
        assert!(!engine.toggle_running());
        assert_eq!(engine.remaining_seconds(), None);
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut engine = CountdownEngine::new();
        engine.start(300).unwrap();
        engine.tick();

        assert!(!engine.toggle_running());
        assert!(engine.toggle_running());
        assert_eq!(engine.remaining_seconds(), Some(299));

        // Paused ticks don't decrement
        engine.toggle_running();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.remaining_seconds(), Some(299));
    }

    #[test]
    fn test_tick_decrements_by_one() {
        let mut engine = CountdownEngine::new();
        engine.start(10).unwrap();
        assert_eq!(engine.tick(), TickOutcome::Ticked { remaining_seconds: 9 });
        assert_eq!(engine.remaining_seconds(), Some(9));
    }

    #[test]
    fn test_n_ticks_reach_zero_and_stop() {
        for n in [1u64, 2, 7, 60] {
            let mut engine = CountdownEngine::new();
            engine.start(n).unwrap();
            for _ in 0..n {
                engine.tick();
            }
            assert_eq!(engine.remaining_seconds(), Some(0));
            assert!(!engine.is_running());
        }
    }

    #[test]
    fn test_completion_reported_once() {
        let mut engine = CountdownEngine::new();
        engine.start(2).unwrap();
        let outcomes: Vec<_> = (0..3).map(|_| engine.tick()).collect();
        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Ticked { remaining_seconds: 1 },
                TickOutcome::Completed,
                TickOutcome::Idle,
            ]
        );
    }

    #[test]
    fn test_finished_countdown_cannot_resume() {
        let mut engine = CountdownEngine::new();
        engine.start(1).unwrap();
        assert_eq!(engine.tick(), TickOutcome::Completed);
        assert!(!engine.toggle_running());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.display().as_deref(), Some("0:00"));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(59), "0:59");
        assert_eq!(format_time(754), "12:34");
        assert_eq!(format_time(900), "15:00");
        assert_eq!(format_time(180 * 60), "180:00");
    }
}
