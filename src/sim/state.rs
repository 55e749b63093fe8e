//! App state and update functions
//!
//! Everything a running coin needs lives in one value owned by the caller.
//! Platform code feeds it sensor samples, taps, flip presses and frame
//! deltas, then reads poses back out for rendering.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::gesture::CheatMode;
use super::outcome::{Face, HapticPulse, decide_outcome, haptic_for};
use super::sequencer::{CoinPose, FlipEvent, FlipSequencer, FlipStage, TextPose};
use super::tilt::{TiltReading, TiltSampler};
use crate::consts::{MAX_FRAME_DT_MS, SENSOR_INTERVAL_MS, SPINS};

/// What a successful flip request decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipStart {
    pub outcome: Face,
    /// Tilt read for this flip
    pub tilt: f32,
    /// Pulse to fire right away, if any
    pub haptic: Option<HapticPulse>,
}

/// Complete coin state
#[derive(Debug, Clone)]
pub struct CoinState {
    seed: u64,
    rng: Pcg32,
    sampler: TiltSampler,
    cheat: CheatMode,
    sequencer: FlipSequencer,
    result: Option<Face>,
    flips: u64,
}

impl CoinState {
    /// New state with default sampling interval and spin count
    pub fn new(seed: u64) -> Self {
        Self::with_options(seed, SENSOR_INTERVAL_MS, SPINS)
    }

    pub fn with_options(seed: u64, sensor_interval_ms: u32, spins: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            sampler: TiltSampler::new(sensor_interval_ms),
            cheat: CheatMode::default(),
            sequencer: FlipSequencer::new(spins),
            result: None,
            flips: 0,
        }
    }

    /// Feed a raw sensor sample. Returns false if it was throttled.
    pub fn on_sensor_sample(&mut self, x: f32, now_ms: f64) -> bool {
        self.sampler.offer(x, now_ms)
    }

    /// Feed a background tap. Returns true if cheat mode was toggled.
    pub fn on_background_tap(&mut self, now_ms: f64) -> bool {
        self.cheat.on_tap(now_ms)
    }

    /// Start a flip. Returns `None`, leaving the running flip untouched,
    /// while a previous flip is still in the air.
    pub fn request_flip(&mut self) -> Option<FlipStart> {
        if self.sequencer.is_flipping() {
            log::debug!("Flip ignored, coin still in the air");
            return None;
        }

        let tilt = self.sampler.latest().x();
        let cheat = self.cheat.enabled();
        let haptic = haptic_for(tilt, cheat);
        let outcome = decide_outcome(tilt, cheat, &mut self.rng);

        self.sequencer.start(outcome);
        self.flips += 1;
        log::info!("Flip #{} started (tilt {:.2})", self.flips, tilt);

        Some(FlipStart {
            outcome,
            tilt,
            haptic,
        })
    }

    /// Advance animations by one frame. The delta is clamped so a stalled
    /// tab does not skip straight past the reveal.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<FlipEvent> {
        let events = self.sequencer.advance(dt_ms.clamp(0.0, MAX_FRAME_DT_MS));
        for event in &events {
            if let FlipEvent::Revealed(face) = event {
                self.result = Some(*face);
                log::info!("Revealed {}", face.as_str());
            }
        }
        events
    }

    /// Seed the RNG was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn cheat_enabled(&self) -> bool {
        self.cheat.enabled()
    }

    /// Last revealed face; `None` before the first reveal
    pub fn result(&self) -> Option<Face> {
        self.result
    }

    pub fn tilt(&self) -> TiltReading {
        self.sampler.latest()
    }

    pub fn stage(&self) -> FlipStage {
        self.sequencer.stage()
    }

    pub fn is_flipping(&self) -> bool {
        self.sequencer.is_flipping()
    }

    /// Flips started so far
    pub fn flip_count(&self) -> u64 {
        self.flips
    }

    pub fn coin_pose(&self) -> CoinPose {
        self.sequencer.coin_pose()
    }

    pub fn text_pose(&self) -> TextPose {
        self.sequencer.text_pose()
    }

    /// Face to draw on the coin right now
    pub fn displayed_face(&self) -> Face {
        match self.sequencer.stage() {
            FlipStage::Idle if self.result.is_none() => Face::Heads,
            _ => self.coin_pose().visible_face(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FLIP_DURATION_MS, SIM_FRAME_MS};

    fn finish_flip(state: &mut CoinState) -> Vec<FlipEvent> {
        let mut events = Vec::new();
        for _ in 0..1000 {
            events.extend(state.tick(SIM_FRAME_MS));
            if state.stage() == FlipStage::Idle {
                break;
            }
        }
        events
    }

    #[test]
    fn test_left_tilt_flip() {
        let mut state = CoinState::new(12345);
        state.on_sensor_sample(-10.0, 0.0);
        let start = state.request_flip();
        assert_eq!(
            start,
            Some(FlipStart {
                outcome: Face::Heads,
                tilt: -10.0,
                haptic: Some(HapticPulse::Light),
            })
        );
        assert_eq!(state.result(), None);
        finish_flip(&mut state);
        assert_eq!(state.result(), Some(Face::Heads));
        assert_eq!(state.displayed_face(), Face::Heads);
    }

    #[test]
    fn test_right_tilt_flip() {
        let mut state = CoinState::new(12345);
        state.on_sensor_sample(10.0, 0.0);
        let start = state.request_flip().map(|s| (s.outcome, s.haptic));
        assert_eq!(start, Some((Face::Tails, Some(HapticPulse::Heavy))));
        finish_flip(&mut state);
        assert_eq!(state.result(), Some(Face::Tails));
        assert_eq!(state.displayed_face(), Face::Tails);
    }

    #[test]
    fn test_cheat_off_has_no_haptics() {
        let mut state = CoinState::new(7);
        assert!(!state.on_background_tap(1000.0));
        assert!(state.on_background_tap(1100.0));
        assert!(!state.cheat_enabled());

        state.on_sensor_sample(-10.0, 0.0);
        let start = state.request_flip();
        assert!(start.is_some_and(|s| s.haptic.is_none()));
    }

    #[test]
    fn test_no_sensor_means_flat() {
        let mut state = CoinState::new(3);
        let start = state.request_flip();
        assert!(start.is_some_and(|s| s.tilt == 0.0 && s.haptic.is_none()));
    }

    #[test]
    fn test_flip_during_flip_is_ignored() {
        let mut state = CoinState::new(42);
        state.on_sensor_sample(-10.0, 0.0);
        assert!(state.request_flip().is_some());
        state.tick(50.0);

        // Tilt the other way mid-flight and mash the button
        state.on_sensor_sample(10.0, 200.0);
        for _ in 0..5 {
            assert!(state.request_flip().is_none());
            state.tick(50.0);
        }
        assert_eq!(state.flip_count(), 1);

        finish_flip(&mut state);
        assert_eq!(state.result(), Some(Face::Heads));
    }

    #[test]
    fn test_flip_allowed_after_reveal() {
        let mut state = CoinState::new(42);
        state.request_flip();
        let mut elapsed = 0.0;
        while elapsed < FLIP_DURATION_MS {
            state.tick(SIM_FRAME_MS);
            elapsed += SIM_FRAME_MS;
        }
        assert!(state.result().is_some());
        assert!(state.request_flip().is_some());
        assert_eq!(state.flip_count(), 2);
    }

    #[test]
    fn test_large_frame_is_clamped() {
        let mut state = CoinState::new(1);
        state.request_flip();
        let events = state.tick(60_000.0);
        assert!(!events.iter().any(|e| matches!(e, FlipEvent::Revealed(_))));
        assert!(state.is_flipping());
    }

    #[test]
    fn test_same_seed_same_results() {
        let run = |seed| {
            let mut state = CoinState::new(seed);
            (0..20)
                .filter_map(|_| {
                    let start = state.request_flip();
                    finish_flip(&mut state);
                    start.map(|s| s.outcome)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99999), run(99999));
    }

    #[test]
    fn test_displayed_face_before_first_flip() {
        let state = CoinState::new(0);
        assert_eq!(state.seed(), 0);
        assert_eq!(state.displayed_face(), Face::Heads);
        assert_eq!(state.result(), None);
    }
}
