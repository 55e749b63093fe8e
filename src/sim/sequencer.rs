//! Flip timeline
//!
//! A flip is a fixed sequence of overlapping animation stages, all measured
//! from the moment the flip starts:
//!
//! ```text
//! 0ms     Toss      coin rises and pulses
//! 100ms   Spin      rotation toward the final face
//! 600ms   Fall      spring back down
//! 1800ms  Bounce    outcome revealed, coin bounces, text zooms in
//! 2400ms  TextHold  text steady
//! 3300ms  TextFade  text fades out
//! 3800ms  Idle
//! ```
//!
//! The sequencer only moves when [`FlipSequencer::advance`] is called, so
//! ordering is explicit and tests can step it with any frame size.

use glam::{Quat, Vec3};

use super::easing::{Spring, ease_in_out_quad, ease_out_back, ease_out_cubic, ease_out_quad, lerp};
use super::outcome::Face;
use crate::consts::*;

/// Bounce and text zoom both finish inside this window after the reveal
const REVEAL_ANIM_MS: f32 = 600.0;
const TEXT_HOLD_START_MS: f32 = FLIP_DURATION_MS + REVEAL_ANIM_MS;
const TEXT_FADE_START_MS: f32 = FLIP_DURATION_MS + TEXT_HOLD_MS;
/// Flip fully over, text gone
pub const TIMELINE_END_MS: f32 = TEXT_FADE_START_MS + TEXT_FADE_MS;

const FALL_SPRING: Spring = Spring::new(15.0, 150.0);
const SETTLE_SPRING: Spring = Spring::new(8.0, 100.0);
const BOUNCE_RISE_MS: f32 = 150.0;

const TEXT_ZOOM_MS: f32 = 300.0;
const TEXT_SHRINK_MS: f32 = 150.0;
const TEXT_PEAK_SCALE: f32 = 1.3;
const TEXT_FADE_IN_MS: f32 = 200.0;

/// Animation stage of the current flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipStage {
    /// No flip running, coin at rest
    Idle,
    /// Coin rising
    Toss,
    /// Coin spinning in the air
    Spin,
    /// Coin falling back
    Fall,
    /// Outcome revealed, coin bouncing
    Bounce,
    /// Result text on screen
    TextHold,
    /// Result text fading out
    TextFade,
}

impl FlipStage {
    /// Animated stages and their start offsets, in order
    const TIMELINE: [(FlipStage, f32); 6] = [
        (FlipStage::Toss, 0.0),
        (FlipStage::Spin, SPIN_DELAY_MS),
        (FlipStage::Fall, FALL_DELAY_MS),
        (FlipStage::Bounce, FLIP_DURATION_MS),
        (FlipStage::TextHold, TEXT_HOLD_START_MS),
        (FlipStage::TextFade, TEXT_FADE_START_MS),
    ];

    /// Stage at `elapsed_ms` into a flip
    pub fn at(elapsed_ms: f32) -> Self {
        if elapsed_ms >= TIMELINE_END_MS {
            return FlipStage::Idle;
        }
        Self::TIMELINE
            .iter()
            .rev()
            .find(|(_, start)| elapsed_ms >= *start)
            .map(|(stage, _)| *stage)
            .unwrap_or(FlipStage::Toss)
    }

    /// True before the reveal; flip requests are ignored while airborne
    pub fn is_airborne(&self) -> bool {
        matches!(self, FlipStage::Toss | FlipStage::Spin | FlipStage::Fall)
    }

    pub fn shows_text(&self) -> bool {
        matches!(
            self,
            FlipStage::Bounce | FlipStage::TextHold | FlipStage::TextFade
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlipStage::Idle => "idle",
            FlipStage::Toss => "toss",
            FlipStage::Spin => "spin",
            FlipStage::Fall => "fall",
            FlipStage::Bounce => "bounce",
            FlipStage::TextHold => "text-hold",
            FlipStage::TextFade => "text-fade",
        }
    }
}

/// Things that happened during one `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipEvent {
    StageEntered(FlipStage),
    /// The outcome is now visible
    Revealed(Face),
    /// Result text is gone; the flip is complete
    TextHidden,
}

/// Coin transform for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinPose {
    /// Vertical offset in px (negative is up)
    pub translate_y: f32,
    /// Flip rotation in degrees
    pub rotate_x: f32,
    /// Wobble rotation in degrees
    pub rotate_z: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl CoinPose {
    pub const REST: CoinPose = CoinPose {
        translate_y: 0.0,
        rotate_x: 0.0,
        rotate_z: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Pose `t` ms into a flip whose spin ends at `final_rotation` degrees
    fn at(t: f32, final_rotation: f32) -> Self {
        let translate_y = if t < TOSS_DURATION_MS {
            lerp(0.0, TOSS_HEIGHT, ease_out_quad(t / TOSS_DURATION_MS))
        } else if t < FALL_DELAY_MS {
            TOSS_HEIGHT
        } else {
            FALL_SPRING.displacement(TOSS_HEIGHT, (t - FALL_DELAY_MS) / 1000.0)
        };

        let spin_t = (t - SPIN_DELAY_MS) / SPIN_DURATION_MS;
        let rotate_x = final_rotation * ease_out_cubic(spin_t);
        let rotate_z = WOBBLE_DEGREES * ease_in_out_quad(spin_t);

        let half_toss = TOSS_DURATION_MS / 2.0;
        let bounce_t = t - FLIP_DURATION_MS;
        let scale = if t < half_toss {
            lerp(1.0, TOSS_PEAK_SCALE, ease_out_quad(t / half_toss))
        } else if t < TOSS_DURATION_MS {
            lerp(TOSS_PEAK_SCALE, 1.0, ease_in_out_quad((t - half_toss) / half_toss))
        } else if bounce_t < 0.0 {
            1.0
        } else if bounce_t < BOUNCE_RISE_MS {
            lerp(1.0, BOUNCE_PEAK_SCALE, ease_out_back(bounce_t / BOUNCE_RISE_MS, 2.0))
        } else {
            1.0 + SETTLE_SPRING
                .displacement(BOUNCE_PEAK_SCALE - 1.0, (bounce_t - BOUNCE_RISE_MS) / 1000.0)
        };

        Self {
            translate_y,
            rotate_x,
            rotate_z,
            scale,
            opacity: 1.0,
        }
    }

    /// Coin orientation as a quaternion
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_z(self.rotate_z.to_radians())
            * Quat::from_rotation_x(self.rotate_x.to_radians())
    }

    /// Face pointing at the viewer. The front is heads, the back tails.
    pub fn visible_face(&self) -> Face {
        let normal = self.orientation() * Vec3::Z;
        if normal.z >= 0.0 { Face::Heads } else { Face::Tails }
    }

    /// CSS `transform` value for the coin element
    pub fn css_transform(&self) -> String {
        format!(
            "perspective(1000px) translateY({:.2}px) rotateX({:.2}deg) rotateZ({:.2}deg) scale({:.3})",
            self.translate_y, self.rotate_x, self.rotate_z, self.scale
        )
    }
}

/// Result text transform for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPose {
    pub visible: bool,
    pub scale: f32,
    pub opacity: f32,
}

impl TextPose {
    pub const HIDDEN: TextPose = TextPose {
        visible: false,
        scale: 0.0,
        opacity: 0.0,
    };

    fn at(t: f32) -> Self {
        if !FlipStage::at(t).shows_text() {
            return Self::HIDDEN;
        }
        let rel = t - FLIP_DURATION_MS;

        let scale = if rel < TEXT_ZOOM_MS {
            lerp(0.0, TEXT_PEAK_SCALE, ease_out_back(rel / TEXT_ZOOM_MS, 1.5))
        } else if rel < TEXT_ZOOM_MS + TEXT_SHRINK_MS {
            lerp(TEXT_PEAK_SCALE, 1.0, ease_in_out_quad((rel - TEXT_ZOOM_MS) / TEXT_SHRINK_MS))
        } else {
            1.0
        };

        let opacity = if rel < TEXT_FADE_IN_MS {
            ease_in_out_quad(rel / TEXT_FADE_IN_MS)
        } else if rel < TEXT_HOLD_MS {
            1.0
        } else {
            1.0 - ease_in_out_quad((rel - TEXT_HOLD_MS) / TEXT_FADE_MS)
        };

        Self {
            visible: true,
            scale,
            opacity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveFlip {
    outcome: Face,
    elapsed_ms: f32,
}

/// Stage machine for one coin
#[derive(Debug, Clone)]
pub struct FlipSequencer {
    spins: u32,
    flip: Option<ActiveFlip>,
}

impl Default for FlipSequencer {
    fn default() -> Self {
        Self::new(SPINS)
    }
}

impl FlipSequencer {
    /// `spins` full rotations before landing (at least one)
    pub fn new(spins: u32) -> Self {
        Self {
            spins: spins.max(1),
            flip: None,
        }
    }

    /// Begin a flip toward `outcome`. Returns false, changing nothing, if a
    /// flip is still in the air.
    pub fn start(&mut self, outcome: Face) -> bool {
        if self.is_flipping() {
            return false;
        }
        self.flip = Some(ActiveFlip {
            outcome,
            elapsed_ms: 0.0,
        });
        true
    }

    pub fn is_flipping(&self) -> bool {
        self.stage().is_airborne()
    }

    pub fn stage(&self) -> FlipStage {
        self.flip
            .map(|f| FlipStage::at(f.elapsed_ms))
            .unwrap_or(FlipStage::Idle)
    }

    /// Outcome of the current (or last) flip once it has been revealed
    pub fn revealed(&self) -> Option<Face> {
        self.flip
            .filter(|f| f.elapsed_ms >= FLIP_DURATION_MS)
            .map(|f| f.outcome)
    }

    /// Rotation the spin ends on: whole turns for heads, plus a half for tails
    pub fn final_rotation(&self, outcome: Face) -> f32 {
        let turns = self.spins as f32 * 360.0;
        match outcome {
            Face::Heads => turns,
            Face::Tails => turns + 180.0,
        }
    }

    /// Move the timeline forward. Every boundary crossed produces its events
    /// exactly once, in timeline order.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<FlipEvent> {
        let mut events = Vec::new();
        let Some(flip) = self.flip.as_mut() else {
            return events;
        };
        let prev = flip.elapsed_ms;
        if prev >= TIMELINE_END_MS {
            return events;
        }
        let now = (prev + dt_ms.max(0.0)).min(TIMELINE_END_MS);
        flip.elapsed_ms = now;

        for (stage, start) in FlipStage::TIMELINE {
            if prev < start && start <= now {
                events.push(FlipEvent::StageEntered(stage));
                if stage == FlipStage::Bounce {
                    events.push(FlipEvent::Revealed(flip.outcome));
                }
            }
        }
        if now >= TIMELINE_END_MS {
            events.push(FlipEvent::StageEntered(FlipStage::Idle));
            events.push(FlipEvent::TextHidden);
        }
        events
    }

    pub fn coin_pose(&self) -> CoinPose {
        match self.flip {
            Some(f) => CoinPose::at(f.elapsed_ms, self.final_rotation(f.outcome)),
            None => CoinPose::REST,
        }
    }

    pub fn text_pose(&self) -> TextPose {
        match self.flip {
            Some(f) => TextPose::at(f.elapsed_ms),
            None => TextPose::HIDDEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn run_until(seq: &mut FlipSequencer, t: f32) -> Vec<FlipEvent> {
        let mut events = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < t {
            events.extend(seq.advance(FRAME_MS));
            elapsed += FRAME_MS;
        }
        events
    }

    #[test]
    fn test_stage_timeline() {
        assert_eq!(FlipStage::at(0.0), FlipStage::Toss);
        assert_eq!(FlipStage::at(99.0), FlipStage::Toss);
        assert_eq!(FlipStage::at(100.0), FlipStage::Spin);
        assert_eq!(FlipStage::at(600.0), FlipStage::Fall);
        assert_eq!(FlipStage::at(1799.0), FlipStage::Fall);
        assert_eq!(FlipStage::at(1800.0), FlipStage::Bounce);
        assert_eq!(FlipStage::at(2400.0), FlipStage::TextHold);
        assert_eq!(FlipStage::at(3300.0), FlipStage::TextFade);
        assert_eq!(FlipStage::at(TIMELINE_END_MS), FlipStage::Idle);
    }

    #[test]
    fn test_idle_until_started() {
        let mut seq = FlipSequencer::default();
        assert_eq!(seq.stage(), FlipStage::Idle);
        assert!(seq.advance(500.0).is_empty());
        assert_eq!(seq.coin_pose(), CoinPose::REST);
        assert_eq!(seq.text_pose(), TextPose::HIDDEN);
        assert_eq!(seq.revealed(), None);
    }

    #[test]
    fn test_flip_rejected_while_airborne() {
        let mut seq = FlipSequencer::default();
        assert!(seq.start(Face::Tails));
        run_until(&mut seq, 700.0);
        assert!(seq.is_flipping());

        assert!(!seq.start(Face::Heads));
        let events = run_until(&mut seq, 1200.0);
        assert!(events.contains(&FlipEvent::Revealed(Face::Tails)));
        assert_eq!(seq.revealed(), Some(Face::Tails));
    }

    #[test]
    fn test_events_fire_once_in_order() {
        let mut seq = FlipSequencer::default();
        seq.start(Face::Heads);
        let events = seq.advance(10_000.0);
        assert_eq!(
            events,
            vec![
                FlipEvent::StageEntered(FlipStage::Spin),
                FlipEvent::StageEntered(FlipStage::Fall),
                FlipEvent::StageEntered(FlipStage::Bounce),
                FlipEvent::Revealed(Face::Heads),
                FlipEvent::StageEntered(FlipStage::TextHold),
                FlipEvent::StageEntered(FlipStage::TextFade),
                FlipEvent::StageEntered(FlipStage::Idle),
                FlipEvent::TextHidden,
            ]
        );
        assert!(seq.advance(10_000.0).is_empty());
        assert_eq!(seq.stage(), FlipStage::Idle);
    }

    #[test]
    fn test_frame_stepping_matches_single_step() {
        let mut seq = FlipSequencer::default();
        seq.start(Face::Tails);
        let events = run_until(&mut seq, TIMELINE_END_MS + 100.0);
        let reveals = events
            .iter()
            .filter(|e| matches!(e, FlipEvent::Revealed(_)))
            .count();
        let hides = events.iter().filter(|e| **e == FlipEvent::TextHidden).count();
        assert_eq!((reveals, hides), (1, 1));
    }

    #[test]
    fn test_landing_shows_outcome() {
        for spins in [1, SPINS] {
            for face in [Face::Heads, Face::Tails] {
                let mut seq = FlipSequencer::new(spins);
                seq.start(face);
                seq.advance(FLIP_DURATION_MS);
                assert_eq!(seq.coin_pose().visible_face(), face);
                seq.advance(TIMELINE_END_MS);
                assert_eq!(seq.coin_pose().visible_face(), face);
            }
        }
    }

    #[test]
    fn test_coin_turns_over_while_spinning() {
        let mut seq = FlipSequencer::default();
        seq.start(Face::Heads);
        let mut seen_tails = false;
        for _ in 0..(FLIP_DURATION_MS / FRAME_MS) as usize {
            seq.advance(FRAME_MS);
            seen_tails |= seq.coin_pose().visible_face() == Face::Tails;
        }
        assert!(seen_tails);
    }

    #[test]
    fn test_toss_arc() {
        let mut seq = FlipSequencer::default();
        seq.start(Face::Heads);
        assert!((seq.coin_pose().translate_y).abs() < 1e-3);
        seq.advance(200.0);
        assert!((seq.coin_pose().scale - TOSS_PEAK_SCALE).abs() < 1e-3);
        seq.advance(300.0);
        assert!((seq.coin_pose().translate_y - TOSS_HEIGHT).abs() < 1e-3);
        seq.advance(1300.0);
        assert!(seq.coin_pose().translate_y.abs() < 1.0);
    }

    #[test]
    fn test_text_only_after_reveal() {
        let mut seq = FlipSequencer::default();
        seq.start(Face::Heads);
        seq.advance(1799.0);
        assert!(!seq.text_pose().visible);
        seq.advance(1.0);
        let pose = seq.text_pose();
        assert!(pose.visible);
        assert!(pose.opacity.abs() < 1e-3);
        seq.advance(500.0);
        let pose = seq.text_pose();
        assert!((pose.opacity - 1.0).abs() < 1e-3);
        assert!((pose.scale - 1.0).abs() < 1e-3);
        seq.advance(TEXT_HOLD_MS + TEXT_FADE_MS);
        assert!(!seq.text_pose().visible);
    }

    #[test]
    fn test_new_flip_during_text_hides_it() {
        let mut seq = FlipSequencer::default();
        seq.start(Face::Heads);
        seq.advance(2000.0);
        assert!(seq.text_pose().visible);
        assert!(!seq.is_flipping());

        assert!(seq.start(Face::Tails));
        assert_eq!(seq.stage(), FlipStage::Toss);
        assert!(!seq.text_pose().visible);
        assert_eq!(seq.revealed(), None);
    }

    #[test]
    fn test_css_transform() {
        assert_eq!(
            CoinPose::REST.css_transform(),
            "perspective(1000px) translateY(0.00px) rotateX(0.00deg) rotateZ(0.00deg) scale(1.000)"
        );
    }
}
