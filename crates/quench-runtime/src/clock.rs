//! Frame timing with a fixed-step budget

/// Longest frame the clock will accept; anything beyond is treated as a stall
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// Tracks elapsed time and owes whole fixed steps to the runner.
///
/// Callers feed frame deltas through [`GameClock::advance`]. Systems only ever
/// see the fixed step, so a run is repeatable regardless of frame pacing.
#[derive(Debug, Clone)]
pub struct GameClock {
    step: f64,
    delta: f64,
    elapsed: f64,
    frames: u64,
    owed: f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock {
    /// 60 Hz fixed step
    pub fn new() -> Self {
        Self::with_fixed_step(1.0 / 60.0)
    }

    /// Clock stepping every `step` seconds. Non-positive or NaN steps fall back to 60 Hz.
    pub fn with_fixed_step(step: f64) -> Self {
        let step = if step > 0.0 { step } else { 1.0 / 60.0 };
        Self {
            step,
            delta: 0.0,
            elapsed: 0.0,
            frames: 0,
            owed: 0.0,
        }
    }

    pub fn fixed_timestep(&self) -> f64 {
        self.step
    }

    /// Delta of the most recent frame after clamping
    pub fn delta_time(&self) -> f64 {
        self.delta
    }

    pub fn total_time(&self) -> f64 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Advance by a frame delta. Negative and NaN deltas count as zero.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_FRAME_DELTA) };
        self.delta = dt;
        self.elapsed += dt;
        self.owed += dt;
        self.frames += 1;
    }

    /// Number of whole fixed steps owed; the remainder carries to the next frame
    pub fn take_fixed_steps(&mut self) -> u32 {
        let steps = (self.owed / self.step).floor();
        self.owed -= steps * self.step;
        steps as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_with_sixty_hertz_step() {
        let clock = GameClock::default();
        assert_eq!(clock.total_time(), 0.0);
        assert_eq!(clock.frame_count(), 0);
        assert!((clock.fixed_timestep() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn bad_step_falls_back_to_sixty_hertz() {
        assert_eq!(GameClock::with_fixed_step(0.0).fixed_timestep(), 1.0 / 60.0);
        assert_eq!(GameClock::with_fixed_step(f64::NAN).fixed_timestep(), 1.0 / 60.0);
    }

    #[test]
    fn stalls_and_bad_deltas_are_clamped() {
        let mut clock = GameClock::new();
        clock.advance(3.0);
        assert_eq!(clock.delta_time(), MAX_FRAME_DELTA);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time(), 0.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.delta_time(), 0.0);
        assert_eq!(clock.total_time(), MAX_FRAME_DELTA);
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn remainder_carries_into_the_next_frame() {
        let mut clock = GameClock::with_fixed_step(0.05);
        clock.advance(0.125);
        assert_eq!(clock.take_fixed_steps(), 2);
        assert_eq!(clock.take_fixed_steps(), 0);

        clock.advance(0.03);
        assert_eq!(clock.take_fixed_steps(), 1);
    }

    #[test]
    fn matching_frame_and_step_run_one_step_per_frame() {
        let dt = 1.0 / 30.0;
        let mut clock = GameClock::with_fixed_step(dt);
        for _ in 0..100 {
            clock.advance(dt);
            assert_eq!(clock.take_fixed_steps(), 1);
        }
    }
}
