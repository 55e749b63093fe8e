//! Latest tilt value, with the sampling interval applied

use crate::consts::SENSOR_INTERVAL_MS;

/// Last-value-wins tilt scalar (x axis)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltReading(f32);

impl TiltReading {
    /// Non-finite readings collapse to 0.0 (flat)
    pub fn new(x: f32) -> Self {
        if x.is_finite() { Self(x) } else { Self(0.0) }
    }

    pub fn x(&self) -> f32 {
        self.0
    }
}

/// Accepts at most one sample per update interval
#[derive(Debug, Clone)]
pub struct TiltSampler {
    interval_ms: f64,
    last_accepted_ms: Option<f64>,
    reading: TiltReading,
}

impl Default for TiltSampler {
    fn default() -> Self {
        Self::new(SENSOR_INTERVAL_MS)
    }
}

impl TiltSampler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms as f64,
            last_accepted_ms: None,
            reading: TiltReading::default(),
        }
    }

    /// Offer a raw sample. Returns false if it arrived inside the interval
    /// and was dropped.
    pub fn offer(&mut self, x: f32, now_ms: f64) -> bool {
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        self.reading = TiltReading::new(x);
        true
    }

    /// Most recent accepted reading (0.0 if the sensor never fired)
    pub fn latest(&self) -> TiltReading {
        self.reading
    }
}
