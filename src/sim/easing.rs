//! Easing curves and a damped spring
//!
//! Easing functions take normalized time and clamp it to [0, 1].

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Overshoots past 1 before settling; `s` controls how far
#[inline]
pub fn ease_out_back(t: f32, s: f32) -> f32 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - (s + 1.0) * u * u * u + s * u * u
}

/// Damped harmonic oscillator released from rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub damping: f32,
    pub stiffness: f32,
    pub mass: f32,
}

impl Spring {
    pub const fn new(damping: f32, stiffness: f32) -> Self {
        Self {
            damping,
            stiffness,
            mass: 1.0,
        }
    }

    /// Undamped angular frequency
    fn omega(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping ratio (1.0 = critical)
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Offset from the rest point `t` seconds after release at offset `x0`
    pub fn displacement(&self, x0: f32, t: f32) -> f32 {
        let t = t.max(0.0);
        let w0 = self.omega();
        let zeta = self.damping_ratio();

        if (zeta - 1.0).abs() < 1e-4 {
            x0 * (1.0 + w0 * t) * (-w0 * t).exp()
        } else if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * w0 * t).exp();
            decay * (x0 * (wd * t).cos() + (zeta * w0 * x0 / wd) * (wd * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - root);
            let r2 = -w0 * (zeta + root);
            let a = -r2 * x0 / (r1 - r2);
            let b = x0 - a;
            a * (r1 * t).exp() + b * (r2 * t).exp()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_curve_endpoints() {
        for f in [ease_out_quad, ease_in_out_quad, ease_out_cubic] {
            assert!(f(0.0).abs() < EPS);
            assert!((f(1.0) - 1.0).abs() < EPS);
            // Clamped outside the unit range
            assert!((f(2.0) - 1.0).abs() < EPS);
            assert!(f(-1.0).abs() < EPS);
        }
        assert!(ease_out_back(0.0, 2.0).abs() < EPS);
        assert!((ease_out_back(1.0, 2.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_back_overshoots() {
        let peak = (1..100)
            .map(|i| ease_out_back(i as f32 / 100.0, 1.5))
            .fold(0.0f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_in_out_quad_midpoint() {
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_spring_starts_at_offset() {
        for spring in [Spring::new(15.0, 150.0), Spring::new(2.0, 1.0), Spring::new(10.0, 1.0)] {
            assert!((spring.displacement(-150.0, 0.0) + 150.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_spring_settles() {
        let fall = Spring::new(15.0, 150.0);
        assert!(fall.displacement(-150.0, 2.0).abs() < 0.1);
        let over = Spring::new(10.0, 1.0);
        assert!(over.damping_ratio() > 1.0);
        assert!(over.displacement(1.0, 60.0).abs() < 0.01);
    }

    #[test]
    fn test_underdamped_overshoots() {
        let bounce = Spring::new(8.0, 100.0);
        assert!(bounce.damping_ratio() < 1.0);
        let min = (0..100)
            .map(|i| bounce.displacement(0.1, i as f32 / 100.0))
            .fold(f32::MAX, f32::min);
        assert!(min < 0.0, "expected overshoot below rest, got {min}");
    }
}
