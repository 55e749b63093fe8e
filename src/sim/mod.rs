//! Deterministic flip logic
//!
//! Everything that decides or animates a flip lives here. This module must be
//! pure and deterministic:
//! - Time only arrives as explicit millisecond arguments
//! - Seeded RNG only
//! - No DOM or platform dependencies

pub mod easing;
pub mod gesture;
pub mod outcome;
pub mod sequencer;
pub mod state;
pub mod tilt;

pub use easing::Spring;
pub use gesture::{CheatMode, DoubleTapDetector};
pub use outcome::{Face, HapticPulse, TiltDirection, decide_outcome, haptic_for};
pub use sequencer::{CoinPose, FlipEvent, FlipSequencer, FlipStage, TextPose};
pub use state::{CoinState, FlipStart};
pub use tilt::{TiltReading, TiltSampler};
