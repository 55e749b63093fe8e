//! Haptic feedback using the Vibration API
//!
//! Natively there is nothing to vibrate, so pulses are only logged.
//! Browsers without `navigator.vibrate` (iOS Safari) get no pulses at all.

use crate::settings::Settings;
use crate::sim::HapticPulse;

/// Haptics manager for the app
pub struct HapticManager {
    #[cfg(target_arch = "wasm32")]
    navigator: Option<web_sys::Navigator>,
    enabled: bool,
    light_ms: u32,
    heavy_ms: u32,
    /// Platform can vibrate; cleared on the first rejected call
    available: bool,
    /// Unsupported warning already logged
    warned: bool,
}

impl Default for HapticManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl HapticManager {
    pub fn new(settings: &Settings) -> Self {
        let mut haptics = Self::configure(settings, true);
        haptics.attach_platform();
        haptics
    }

    fn configure(settings: &Settings, available: bool) -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            navigator: None,
            enabled: settings.haptics,
            light_ms: settings.pulse_ms(HapticPulse::Light),
            heavy_ms: settings.pulse_ms(HapticPulse::Heavy),
            available,
            warned: false,
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn attach_platform(&mut self) {
        self.navigator = find_navigator();
        self.available = self.navigator.is_some();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn attach_platform(&mut self) {}

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.available
    }

    /// Vibration length for a pulse
    pub fn duration_ms(&self, pulse: HapticPulse) -> u32 {
        match pulse {
            HapticPulse::Light => self.light_ms,
            HapticPulse::Heavy => self.heavy_ms,
        }
    }

    /// Fire a pulse. Returns true if the platform accepted it.
    pub fn fire(&mut self, pulse: HapticPulse) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.available {
            self.warn_unsupported();
            return false;
        }
        let ms = self.duration_ms(pulse);
        if ms == 0 {
            return false;
        }
        let accepted = self.vibrate(ms);
        if !accepted {
            self.available = false;
            self.warn_unsupported();
        }
        accepted
    }

    fn warn_unsupported(&mut self) {
        if !self.warned {
            log::warn!("Vibration not supported - haptics disabled");
            self.warned = true;
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn vibrate(&self, ms: u32) -> bool {
        self.navigator
            .as_ref()
            .is_some_and(|n| n.vibrate_with_duration(ms))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn vibrate(&self, ms: u32) -> bool {
        log::debug!("Haptic pulse ({}ms)", ms);
        true
    }
}

/// Navigator, only if it has `vibrate`. Calling the binding where the
/// method is missing throws straight through the frame loop.
#[cfg(target_arch = "wasm32")]
fn find_navigator() -> Option<web_sys::Navigator> {
    let navigator = web_sys::window()?.navigator();
    let key = wasm_bindgen::JsValue::from_str("vibrate");
    if js_sys::Reflect::has(&navigator, &key).unwrap_or(false) {
        Some(navigator)
    } else {
        None
    }
}
