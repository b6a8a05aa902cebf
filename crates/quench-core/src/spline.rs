//! Piecewise-linear value curves.
//!
//! A `Spline` maps a normalized parameter (usually particle age in [0, 1]) to a
//! value by linear interpolation between the two surrounding control points.
//! Outside the control range the first/last value is held.

use crate::{Lerp, QuenchError, Result};

/// A piecewise-linear curve over `(t, value)` control points.
///
/// Control points must be ordered by non-decreasing `t`; this is not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline<T> {
    points: Vec<(f32, T)>,
}

impl<T: Lerp + Copy> Spline<T> {
    /// Build a spline from control points. At least one point is required.
    pub fn new(points: Vec<(f32, T)>) -> Result<Self> {
        if points.is_empty() {
            return Err(QuenchError::InvalidConfig(
                "spline needs at least one control point".into(),
            ));
        }
        Ok(Self { points })
    }

    /// A spline that evaluates to `value` everywhere.
    pub fn constant(value: T) -> Self {
        Self {
            points: vec![(0.0, value)],
        }
    }

    /// Two-point spline from `start` at t=0 to `end` at t=1.
    pub fn linear(start: T, end: T) -> Self {
        Self {
            points: vec![(0.0, start), (1.0, end)],
        }
    }

    pub fn points(&self) -> &[(f32, T)] {
        &self.points
    }

    /// Evaluate the curve at `t`, clamping outside the control range.
    pub fn evaluate(&self, t: f32) -> T {
        let (first_t, first_v) = self.points[0];
        if t <= first_t {
            return first_v;
        }

        for pair in self.points.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= 0.0 {
                    return v1;
                }
                return v0.lerp(&v1, (t - t0) / span);
            }
        }

        self.points[self.points.len() - 1].1
    }
}
