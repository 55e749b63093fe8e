//! Tilt Coin - a coin flip with a hidden tilt-to-cheat mode
//!
//! Core modules:
//! - `sim`: Deterministic flip logic (outcome, gesture, timeline)
//! - `sensor`: Device motion subscription (wasm only)
//! - `haptics`: Vibration pulses
//! - `settings`: Runtime preferences

pub mod haptics;
#[cfg(target_arch = "wasm32")]
pub mod sensor;
pub mod settings;
pub mod sim;

pub use haptics::HapticManager;
pub use settings::Settings;

/// App configuration constants
pub mod consts {
    /// Tilt magnitude below which the device counts as flat
    pub const TILT_THRESHOLD: f32 = 5.0;
    /// Two background taps closer than this toggle cheat mode
    pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;
    /// Default sensor update interval
    pub const SENSOR_INTERVAL_MS: u32 = 100;

    /// Time from flip start to reveal
    pub const FLIP_DURATION_MS: f32 = 1800.0;
    /// Toss (rise) duration
    pub const TOSS_DURATION_MS: f32 = 400.0;
    /// Spin starts this long after the toss
    pub const SPIN_DELAY_MS: f32 = 100.0;
    /// Spin runs until the reveal
    pub const SPIN_DURATION_MS: f32 = FLIP_DURATION_MS - TOSS_DURATION_MS;
    /// Fall starts this long after the toss
    pub const FALL_DELAY_MS: f32 = 600.0;
    /// How high the coin is tossed (px, screen space so negative is up)
    pub const TOSS_HEIGHT: f32 = -150.0;
    /// Scale at the top of the toss
    pub const TOSS_PEAK_SCALE: f32 = 1.15;
    /// Full rotations before landing
    pub const SPINS: u32 = 4;
    /// Z-axis wobble over the spin (degrees)
    pub const WOBBLE_DEGREES: f32 = 720.0;

    /// Scale at the top of the landing bounce
    pub const BOUNCE_PEAK_SCALE: f32 = 1.1;
    /// Result text stays fully visible this long after the reveal
    pub const TEXT_HOLD_MS: f32 = 1500.0;
    /// Result text fade-out duration
    pub const TEXT_FADE_MS: f32 = 500.0;

    /// Largest frame delta fed to the sequencer
    pub const MAX_FRAME_DT_MS: f32 = 100.0;
    /// Frame step for headless runs (60 Hz)
    pub const SIM_FRAME_MS: f32 = 1000.0 / 60.0;
}
