//! Configuration menu: presets, the custom-minutes form and overlay visibility

use serde::Serialize;
use thiserror::Error;

/// A built-in countdown length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetDuration {
    pub label: &'static str,
    pub seconds: u64,
}

/// Presets in display order, shortest first
pub const PRESETS: [PresetDuration; 3] = [
    PresetDuration { label: "15m", seconds: 15 * 60 },
    PresetDuration { label: "25m", seconds: 25 * 60 },
    PresetDuration { label: "50m", seconds: 50 * 60 },
];

/// Default upper bound for custom durations, matching the input widget
pub const DEFAULT_MAX_CUSTOM_MINUTES: u64 = 180;

/// Look up a preset by its label
pub fn find_preset(label: &str) -> Option<PresetDuration> {
    PRESETS.iter().copied().find(|preset| preset.label == label)
}

/// Reasons a custom duration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomDurationError {
    #[error("custom duration is empty")]
    Empty,
    #[error("custom duration {0:?} does not start with a number")]
    NotANumber(String),
    #[error("custom duration must be greater than zero minutes")]
    NotPositive,
    #[error("custom duration may not exceed {max} minutes")]
    TooLong { max: u64 },
}

/// Read the leading integer of the custom field as minutes in `1..=max_minutes`.
/// Anything after the digits is ignored.
pub fn parse_custom_minutes(text: &str, max_minutes: u64) -> Result<u64, CustomDurationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CustomDurationError::Empty);
    }

    // Leading integer prefix: "1.5" reads as 1, "12abc" as 12
    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(CustomDurationError::NotANumber(trimmed.to_string()));
    }

    let digits = unsigned[..digits_len].trim_start_matches('0');
    if digits.is_empty() || negative {
        return Err(CustomDurationError::NotPositive);
    }
    match digits.parse::<u64>() {
        Ok(minutes) if minutes <= max_minutes => Ok(minutes),
        _ => Err(CustomDurationError::TooLong { max: max_minutes }),
    }
}

/// Overlay state. `custom_input_open` implies `open`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMenu {
    open: bool,
    custom_input_open: bool,
    custom_input_text: String,
    input_focused: bool,
}

impl ConfigMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the overlay and reset the custom form
    pub fn close(&mut self) {
        self.open = false;
        self.custom_input_open = false;
        self.custom_input_text.clear();
        self.input_focused = false;
    }

    /// Trigger button behaviour: open when closed, close when open
    pub fn toggle(&mut self) -> bool {
        if self.open {
            self.close();
        } else {
            self.open();
        }
        self.open
    }

    /// Reveal the custom form and focus its field. Returns false when it
    /// was already showing or the menu itself is closed.
    pub fn open_custom_input(&mut self) -> bool {
        if !self.open || self.custom_input_open {
            return false;
        }
        self.custom_input_open = true;
        self.input_focused = true;
        true
    }

    /// Replace the raw text of the custom field
    pub fn set_custom_text(&mut self, text: impl Into<String>) {
        if self.custom_input_open {
            self.custom_input_text = text.into();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn custom_input_open(&self) -> bool {
        self.custom_input_open
    }

    pub fn custom_input_text(&self) -> &str {
        &self.custom_input_text
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }
}
