//! Hidden cheat toggle
//!
//! Two background taps inside [`DOUBLE_TAP_WINDOW_MS`] flip the cheat flag.
//! After a toggle the detector forgets the last tap, so a third quick tap
//! starts a new pair instead of toggling back.

use crate::consts::DOUBLE_TAP_WINDOW_MS;

/// Two-state tap debounce
#[derive(Debug, Clone, Default)]
pub struct DoubleTapDetector {
    /// Timestamp (ms) of the unpaired tap, if any
    last_tap_ms: Option<f64>,
}

impl DoubleTapDetector {
    pub fn new() -> Self {
        Self { last_tap_ms: None }
    }

    /// Register a tap. Returns true when it completes a double tap.
    pub fn register_tap(&mut self, now_ms: f64) -> bool {
        match self.last_tap_ms {
            Some(last) if now_ms - last < DOUBLE_TAP_WINDOW_MS => {
                self.last_tap_ms = None;
                true
            }
            _ => {
                self.last_tap_ms = Some(now_ms);
                false
            }
        }
    }
}

/// The cheat flag plus the gesture that toggles it
#[derive(Debug, Clone)]
pub struct CheatMode {
    enabled: bool,
    detector: DoubleTapDetector,
}

impl Default for CheatMode {
    fn default() -> Self {
        Self {
            enabled: true,
            detector: DoubleTapDetector::new(),
        }
    }
}

impl CheatMode {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Feed a background tap. Returns true if the flag was toggled.
    pub fn on_tap(&mut self, now_ms: f64) -> bool {
        if self.detector.register_tap(now_ms) {
            self.enabled = !self.enabled;
            log::info!("Cheat mode {}", if self.enabled { "on" } else { "off" });
            true
        } else {
            false
        }
    }
}
