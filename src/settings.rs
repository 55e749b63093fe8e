//! App settings
//!
//! Read once at startup and never written back. On the web they come from a
//! `data-settings` JSON attribute on `#app`; natively from a JSON file.

use serde::{Deserialize, Serialize};

use crate::consts::{SENSOR_INTERVAL_MS, SPINS};
use crate::sim::HapticPulse;

/// Runtime preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Haptics ===
    /// Vibrate when a tilted flip starts
    pub haptics: bool,
    /// Pulse length for a left tilt (ms)
    pub light_pulse_ms: u32,
    /// Pulse length for a right tilt (ms)
    pub heavy_pulse_ms: u32,

    // === Sensor ===
    /// Minimum gap between accepted tilt samples (ms)
    pub sensor_interval_ms: u32,
    /// Log every accepted sample at debug level
    pub log_sensor_samples: bool,

    // === Accessibility ===
    /// One rotation per flip instead of a full spin
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptics: true,
            light_pulse_ms: 15,
            heavy_pulse_ms: 40,

            sensor_interval_ms: SENSOR_INTERVAL_MS,
            log_sensor_samples: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Vibration length for a pulse
    pub fn pulse_ms(&self, pulse: HapticPulse) -> u32 {
        match pulse {
            HapticPulse::Light => self.light_pulse_ms,
            HapticPulse::Heavy => self.heavy_pulse_ms,
        }
    }

    /// Full rotations per flip (respects reduced_motion)
    pub fn effective_spins(&self) -> u32 {
        if self.reduced_motion { 1 } else { SPINS }
    }

    /// Element whose `data-settings` attribute holds the JSON
    #[cfg(target_arch = "wasm32")]
    const ROOT_ELEMENT_ID: &'static str = "app";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ROOT_ELEMENT_ID))
            .and_then(|el| el.get_attribute("data-settings"));

        match json.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from page");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Invalid data-settings ({}), using defaults", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));

        match parsed {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not load {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
