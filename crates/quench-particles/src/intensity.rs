//! The fire intensity scalar shared between the coupler and the fire systems

use std::cell::Cell;
use std::rc::Rc;

/// Writable fire intensity in [0, 1], owned by the suppression coupler.
///
/// Single-threaded: the handle is `Rc`-based and never crosses a thread.
#[derive(Debug)]
pub struct FireIntensity {
    value: Rc<Cell<f32>>,
}

impl FireIntensity {
    pub fn new(initial: f32) -> Self {
        Self {
            value: Rc::new(Cell::new(clamp_unit(initial))),
        }
    }

    pub fn get(&self) -> f32 {
        self.value.get()
    }

    /// Set the intensity, clamped to [0, 1]
    pub fn set(&self, value: f32) {
        self.value.set(clamp_unit(value));
    }

    /// Lower the intensity by one step of `amount`, floored at 0.
    ///
    /// A remainder below half a step snaps to 0, so `n` equal steps that add up
    /// to the current intensity end at exactly 0 despite f32 rounding.
    pub fn decrease(&self, amount: f32) {
        let step = amount.max(0.0);
        let remaining = self.get() - step;
        if step > 0.0 && remaining < step * 0.5 {
            self.set(0.0);
        } else {
            self.set(remaining);
        }
    }

    /// Read-only handle for systems and collaborators that only poll
    pub fn reader(&self) -> IntensityReader {
        IntensityReader {
            value: Rc::clone(&self.value),
        }
    }
}

/// Read-only view of a [`FireIntensity`]
#[derive(Debug, Clone)]
pub struct IntensityReader {
    value: Rc<Cell<f32>>,
}

impl IntensityReader {
    pub fn get(&self) -> f32 {
        self.value.get()
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
