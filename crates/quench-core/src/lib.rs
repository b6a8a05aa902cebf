//! Quench Core - Foundational types for the Quench simulation
//!
//! This crate provides the types every other Quench crate depends on:
//! - `Vec3`, `Rgb` - Spatial and color types
//! - `Lerp` / `Spline` - Piecewise-linear curves over normalized lifetime
//! - Error types and Result alias

mod error;
pub mod spline;
mod types;

pub use error::{QuenchError, Result};
pub use spline::Spline;
pub use types::{Lerp, Rgb, Vec3};
