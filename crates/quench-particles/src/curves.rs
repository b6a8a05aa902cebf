//! Fixed-shape lifetime curves used by the foam spray

/// Portion of life spent fading in
const FADE_IN_END: f32 = 0.03;
/// Age at which fade-out starts
const FADE_OUT_START: f32 = 0.6;

/// Hermite smoothstep `t²(3 - 2t)` on a clamped `t`
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Size growth from `start` to `end` along a smoothstep, slow-fast-gentle like a widening spray cone
pub fn smooth_size(start: f32, end: f32, age: f32) -> f32 {
    start + (end - start) * smoothstep(age)
}

/// Airborne foam opacity: quick fade-in, full body, linear fade-out over the last 40%
pub fn airborne_alpha(age: f32) -> f32 {
    let age = age.clamp(0.0, 1.0);
    if age < FADE_IN_END {
        age / FADE_IN_END
    } else if age <= FADE_OUT_START {
        1.0
    } else {
        (1.0 - age) / (1.0 - FADE_OUT_START)
    }
}

/// Grounded foam opacity follows remaining life rather than age, so puddles linger
pub fn grounded_alpha(life: f32, max_life: f32, scale: f32) -> f32 {
    if max_life <= 0.0 {
        return 0.0;
    }
    (life / max_life).clamp(0.0, 1.0) * scale
}

/// Puddle growth multiplier, linear in time on the ground and capped
pub fn puddle_scale(ground_time: f32, growth_rate: f32, max_scale: f32) -> f32 {
    (1.0 + ground_time * growth_rate).min(max_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_shape() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        // slow start: below linear early on
        assert!(smoothstep(0.1) < 0.1);
        assert_eq!(smoothstep(-2.0), 0.0);
        assert_eq!(smoothstep(3.0), 1.0);
    }

    #[test]
    fn smooth_size_endpoints() {
        assert!((smooth_size(0.04, 0.3, 0.0) - 0.04).abs() < 1e-6);
        assert!((smooth_size(0.04, 0.3, 1.0) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn airborne_alpha_phases() {
        assert_eq!(airborne_alpha(0.0), 0.0);
        assert!((airborne_alpha(0.015) - 0.5).abs() < 1e-4);
        assert_eq!(airborne_alpha(0.3), 1.0);
        assert_eq!(airborne_alpha(0.6), 1.0);
        assert!((airborne_alpha(0.8) - 0.5).abs() < 1e-4);
        assert!(airborne_alpha(1.0).abs() < 1e-6);
    }

    #[test]
    fn grounded_alpha_uses_remaining_life() {
        assert!((grounded_alpha(1.0, 2.0, 0.7) - 0.35).abs() < 1e-6);
        assert_eq!(grounded_alpha(0.0, 2.0, 0.7), 0.0);
        assert_eq!(grounded_alpha(1.0, 0.0, 0.7), 0.0);
    }

    #[test]
    fn puddle_scale_caps() {
        assert_eq!(puddle_scale(0.0, 0.8, 2.5), 1.0);
        assert!((puddle_scale(1.0, 0.8, 2.5) - 1.8).abs() < 1e-6);
        assert_eq!(puddle_scale(10.0, 0.8, 2.5), 2.5);
    }
}
