//! Outcome decision
//!
//! Maps the last tilt reading and the cheat flag to a coin face.

use rand::Rng;
use serde::Serialize;

use crate::consts::TILT_THRESHOLD;

/// A face of the coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Heads,
    Tails,
}

impl Face {
    pub fn as_str(&self) -> &'static str {
        match self {
            Face::Heads => "heads",
            Face::Tails => "tails",
        }
    }

    /// Text shown on reveal
    pub fn label(&self) -> &'static str {
        match self {
            Face::Heads => "HEADS!",
            Face::Tails => "TAILS!",
        }
    }

    /// Draw a face uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Face::Heads
        } else {
            Face::Tails
        }
    }
}

/// Which way the device leans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltDirection {
    Left,
    Right,
    Flat,
}

impl TiltDirection {
    /// Classify a tilt reading. The threshold itself counts as flat, and so
    /// does anything non-finite.
    pub fn classify(x: f32) -> Self {
        if !x.is_finite() {
            TiltDirection::Flat
        } else if x < -TILT_THRESHOLD {
            TiltDirection::Left
        } else if x > TILT_THRESHOLD {
            TiltDirection::Right
        } else {
            TiltDirection::Flat
        }
    }
}

/// Haptic feedback strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticPulse {
    /// Left tilt
    Light,
    /// Right tilt
    Heavy,
}

/// Decide the face for a flip.
///
/// With cheat mode off the draw is uniform. With it on, a left tilt forces
/// heads, a right tilt forces tails, and a flat device still gets a uniform
/// draw.
pub fn decide_outcome<R: Rng + ?Sized>(tilt: f32, cheat_enabled: bool, rng: &mut R) -> Face {
    log::debug!(
        "Deciding outcome - tilt: {:.2}, threshold: {}, cheat: {}",
        tilt,
        TILT_THRESHOLD,
        cheat_enabled
    );

    if !cheat_enabled {
        log::debug!("Cheat mode off - random result");
        return Face::random(rng);
    }

    match TiltDirection::classify(tilt) {
        TiltDirection::Left => {
            log::debug!("Left tilt - heads");
            Face::Heads
        }
        TiltDirection::Right => {
            log::debug!("Right tilt - tails");
            Face::Tails
        }
        TiltDirection::Flat => {
            log::debug!("Flat - random result");
            Face::random(rng)
        }
    }
}

/// Pulse to fire when a flip starts. Cheat mode off means no feedback at all.
pub fn haptic_for(tilt: f32, cheat_enabled: bool) -> Option<HapticPulse> {
    if !cheat_enabled {
        return None;
    }
    match TiltDirection::classify(tilt) {
        TiltDirection::Left => Some(HapticPulse::Light),
        TiltDirection::Right => Some(HapticPulse::Heavy),
        TiltDirection::Flat => None,
    }
}
