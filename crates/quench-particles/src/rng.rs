//! Random sampling for spawn positions, nozzle spread and turbulence

use quench_core::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Random source owned by one simulation instance.
///
/// Production runs seed from OS entropy. Tests pass a fixed seed but only
/// assert bounded properties, never exact draws.
pub struct ParticleRng {
    inner: SmallRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_entropy(),
        }
    }

    /// Uniform in `[lo, hi)`; an empty range yields `lo`
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let u: f32 = self.inner.gen();
        lo + u * (hi - lo)
    }

    /// Uniform in `[-amplitude, amplitude)`
    pub fn signed(&mut self, amplitude: f32) -> f32 {
        self.range(-amplitude, amplitude)
    }

    /// Uniform inside the axis-aligned box `[-h, h]` per component
    pub fn in_box(&mut self, h: Vec3) -> Vec3 {
        Vec3::new(self.signed(h.x), self.signed(h.y), self.signed(h.z))
    }

    /// Unit vector on the floor plane
    pub fn horizontal_direction(&mut self) -> Vec3 {
        let (sin, cos) = self.range(0.0, TAU).sin_cos();
        Vec3::new(cos, 0.0, sin)
    }

    /// Unit vector within `half_angle_deg` of `axis`, uniform over the cap.
    /// Zero spread returns the axis itself; 180 degrees or more covers the sphere.
    pub fn cone_direction(&mut self, axis: Vec3, half_angle_deg: f32) -> Vec3 {
        if half_angle_deg <= 0.0 {
            return axis.normalized();
        }
        let min_cos = half_angle_deg.min(180.0).to_radians().cos();
        let z = self.range(min_cos, 1.0);
        let ring = (1.0 - z * z).max(0.0).sqrt();
        let (sin, cos) = self.range(0.0, TAU).sin_cos();
        Frame::around(axis).to_world(Vec3::new(ring * cos, ring * sin, z))
    }

    /// Uniform point on a disc of `radius` lying perpendicular to `axis`
    pub fn disc_offset(&mut self, axis: Vec3, radius: f32) -> Vec3 {
        if radius <= 0.0 {
            return Vec3::ZERO;
        }
        let r = radius * self.range(0.0, 1.0).sqrt();
        let (sin, cos) = self.range(0.0, TAU).sin_cos();
        Frame::around(axis).to_world(Vec3::new(r * cos, r * sin, 0.0))
    }
}

/// Orthonormal basis whose local +z points along an axis
struct Frame {
    x: Vec3,
    y: Vec3,
    z: Vec3,
}

impl Frame {
    fn around(axis: Vec3) -> Self {
        let z = match axis.normalized() {
            v if v == Vec3::ZERO => Vec3::UP,
            v => v,
        };
        // Avoid a degenerate cross product when the axis is near vertical
        let helper = if z.y.abs() > 0.99 { Vec3::RIGHT } else { Vec3::UP };
        let x = helper.cross(&z).normalized();
        let y = z.cross(&x);
        Self { x, y, z }
    }

    fn to_world(&self, local: Vec3) -> Vec3 {
        self.x * local.x + self.y * local.y + self.z * local.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_half_open() {
        let mut rng = ParticleRng::new(11);
        for _ in 0..1000 {
            let v = rng.range(-2.0, 5.0);
            assert!(v >= -2.0 && v < 5.0);
        }
        assert_eq!(rng.range(0.7, 0.7), 0.7);
    }

    #[test]
    fn zero_spread_follows_the_nozzle() {
        let mut rng = ParticleRng::new(12);
        let dir = rng.cone_direction(Vec3::new(0.0, 0.0, -4.0), 0.0);
        assert_eq!(dir, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn spray_stays_inside_its_cone() {
        let mut rng = ParticleRng::new(13);
        let nozzle = Vec3::new(0.0, -0.3, -1.0).normalized();
        let min_cos = 10.0_f32.to_radians().cos();
        for _ in 0..500 {
            let d = rng.cone_direction(nozzle, 10.0);
            assert!((d.length() - 1.0).abs() < 1e-3);
            assert!(d.dot(&nozzle) >= min_cos - 1e-4);
        }
    }

    #[test]
    fn full_sphere_spread_is_unit_length() {
        let mut rng = ParticleRng::new(14);
        for _ in 0..200 {
            let d = rng.cone_direction(Vec3::UP, 270.0);
            assert!((d.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn disc_offset_lies_across_the_axis() {
        let mut rng = ParticleRng::new(15);
        let axis = Vec3::RIGHT;
        for _ in 0..200 {
            let o = rng.disc_offset(axis, 0.05);
            assert!(o.length() <= 0.05 + 1e-5);
            assert!(o.dot(&axis).abs() < 1e-5);
        }
        assert_eq!(rng.disc_offset(axis, 0.0), Vec3::ZERO);
    }

    #[test]
    fn floor_directions_are_flat() {
        let mut rng = ParticleRng::new(16);
        let d = rng.horizontal_direction();
        assert_eq!(d.y, 0.0);
        assert!((d.horizontal_length() - 1.0).abs() < 1e-5);
    }
}
