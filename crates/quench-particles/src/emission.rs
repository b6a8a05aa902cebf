//! Turning continuous emission rates into whole particle counts

use serde::{Deserialize, Serialize};

/// Fractional particle accumulator for sub-frame emission.
///
/// The fractional remainder carries across ticks, so low rates still emit
/// over time instead of truncating to zero every frame.
#[derive(Debug, Clone, Default)]
pub struct EmissionAccumulator {
    accumulator: f32,
}

impl EmissionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `rate * dt` and return the whole number of particles due this tick.
    ///
    /// A non-positive rate resets the accumulator so a later rise in rate
    /// does not release a stored burst.
    pub fn accumulate(&mut self, effective_rate: f32, dt: f32) -> u32 {
        if effective_rate.is_nan() || effective_rate <= 0.0 {
            self.accumulator = 0.0;
            return 0;
        }
        if dt > 0.0 {
            self.accumulator += effective_rate * dt;
        }
        let count = self.accumulator.floor();
        self.accumulator -= count;
        count as u32
    }

    /// Pending fractional particle
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// How a system's emission rate responds to the fire intensity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntensityResponse {
    /// Unaffected by the fire (foam)
    Constant,
    /// Scales 1:1 with intensity (flame)
    Linear,
    /// `max(0, intensity - threshold)`, so smoke dies out just before the flame
    Offset { threshold: f32 },
}

impl IntensityResponse {
    pub fn factor(&self, intensity: f32) -> f32 {
        match *self {
            IntensityResponse::Constant => 1.0,
            IntensityResponse::Linear => intensity.max(0.0),
            IntensityResponse::Offset { threshold } => (intensity - threshold).max(0.0),
        }
    }

    /// `base_rate * factor(intensity)`
    pub fn effective_rate(&self, base_rate: f32, intensity: f32) -> f32 {
        base_rate * self.factor(intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_carries_fraction() {
        let mut acc = EmissionAccumulator::new();
        // 100/s at 60fps ≈ 1.67 per tick
        assert_eq!(acc.accumulate(100.0, 1.0 / 60.0), 1);
        assert!((acc.remainder() - 0.6667).abs() < 1e-3);
        assert_eq!(acc.accumulate(100.0, 1.0 / 60.0), 2);
    }

    #[test]
    fn low_rate_still_emits() {
        let mut acc = EmissionAccumulator::new();
        let total: u32 = (0..60).map(|_| acc.accumulate(2.0, 1.0 / 60.0)).sum();
        // 2/s for one second, allowing one particle of rounding
        assert!((1..=2).contains(&total));
    }

    #[test]
    fn long_run_average_matches_rate() {
        let mut acc = EmissionAccumulator::new();
        let rate = 37.3;
        let dt = 1.0 / 60.0;
        let ticks = 600;
        let total: u32 = (0..ticks).map(|_| acc.accumulate(rate, dt)).sum();
        let expected = rate * ticks as f32 * dt;
        assert!((total as f32 - expected).abs() <= 1.0, "total {total} expected {expected}");
    }

    #[test]
    fn non_positive_rate_resets() {
        let mut acc = EmissionAccumulator::new();
        acc.accumulate(30.0, 0.02); // 0.6 pending
        assert!(acc.remainder() > 0.5);
        assert_eq!(acc.accumulate(0.0, 0.02), 0);
        assert_eq!(acc.remainder(), 0.0);
        assert_eq!(acc.accumulate(-5.0, 0.02), 0);
        assert_eq!(acc.accumulate(f32::NAN, 0.02), 0);
        assert_eq!(acc.remainder(), 0.0);
    }

    #[test]
    fn intensity_responses() {
        assert_eq!(IntensityResponse::Constant.factor(0.0), 1.0);
        assert_eq!(IntensityResponse::Linear.factor(0.4), 0.4);
        let smoke = IntensityResponse::Offset { threshold: 0.1 };
        assert!((smoke.factor(1.0) - 0.9).abs() < 1e-6);
        assert_eq!(smoke.factor(0.05), 0.0);
        assert_eq!(smoke.effective_rate(25.0, 0.1), 0.0);
        assert_eq!(IntensityResponse::Linear.effective_rate(60.0, 0.0), 0.0);
    }
}
