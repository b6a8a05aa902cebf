//! Foam-on-fire coupling
//!
//! The coupler owns the fire intensity. Each tick it counts the foam
//! droplets near the fire anchor and, when enough are present, knocks the
//! intensity down. Intensity never recovers.

use crate::config::SuppressionConfig;
use crate::intensity::{FireIntensity, IntensityReader};
use quench_core::{Result, Vec3};
use quench_runtime::TrainingEvent;

pub struct SuppressionCoupler {
    config: SuppressionConfig,
    intensity: FireIntensity,
    warned_missing_anchor: bool,
    last_hits: usize,
}

impl SuppressionCoupler {
    pub fn new(config: &SuppressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            intensity: FireIntensity::new(config.initial_intensity),
            warned_missing_anchor: false,
            last_hits: 0,
        })
    }

    /// Handle for the fire systems and anything else that polls intensity
    pub fn intensity_reader(&self) -> IntensityReader {
        self.intensity.reader()
    }

    pub fn fire_intensity(&self) -> f32 {
        self.intensity.get()
    }

    /// Foam droplets counted inside the detection radius on the last tick
    pub fn hits_last_tick(&self) -> usize {
        self.last_hits
    }

    /// Run one suppression check and return the number of droplets in range.
    ///
    /// With no fire anchor the check is skipped and intensity is left alone.
    pub fn update<I>(&mut self, anchor: Option<Vec3>, foam_positions: I, dt: f32) -> usize
    where
        I: IntoIterator<Item = Vec3>,
    {
        let Some(anchor) = anchor else {
            if !self.warned_missing_anchor {
                log::warn!("[suppression] No fire anchor in scene; skipping suppression check");
                self.warned_missing_anchor = true;
            }
            self.last_hits = 0;
            return 0;
        };
        if self.warned_missing_anchor {
            log::info!("[suppression] Fire anchor restored");
            self.warned_missing_anchor = false;
        }

        let radius_sq = self.config.detection_radius * self.config.detection_radius;
        let hits = foam_positions
            .into_iter()
            .filter(|p| p.distance_squared(&anchor) < radius_sq)
            .count();

        if hits > self.config.min_particles {
            self.intensity.decrease(self.config.suppression_rate * dt);
            log::debug!(
                "[suppression] {hits} droplets on the fire, intensity {:.3}",
                self.intensity.get()
            );
        }

        self.last_hits = hits;
        hits
    }
}

/// Reports the fire as extinguished once, when intensity first drops to the threshold
pub struct ExtinguishWatch {
    threshold: f32,
    fired: bool,
}

impl ExtinguishWatch {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            fired: false,
        }
    }

    pub fn poll(&mut self, intensity: f32) -> Option<TrainingEvent> {
        if self.fired || intensity > self.threshold {
            return None;
        }
        self.fired = true;
        Some(TrainingEvent::FireExtinguished { intensity })
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn cluster(center: Vec3, n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| center + Vec3::new(0.01 * i as f32, 0.0, 0.0))
            .collect()
    }

    fn coupler() -> SuppressionCoupler {
        SuppressionCoupler::new(&SuppressionConfig::default()).unwrap()
    }

    #[test]
    fn no_foam_no_change() {
        let mut c = coupler();
        let anchor = Some(Vec3::ZERO);
        for _ in 0..120 {
            assert_eq!(c.update(anchor, std::iter::empty(), DT), 0);
        }
        assert_eq!(c.fire_intensity(), 1.0);
    }

    #[test]
    fn needs_more_than_min_particles() {
        let mut c = coupler();
        let anchor = Some(Vec3::ZERO);
        // Exactly min_particles in range is not enough
        c.update(anchor, cluster(Vec3::ZERO, 5), DT);
        assert_eq!(c.fire_intensity(), 1.0);
        c.update(anchor, cluster(Vec3::ZERO, 6), DT);
        assert!(c.fire_intensity() < 1.0);
    }

    #[test]
    fn far_foam_is_ignored() {
        let mut c = coupler();
        let hits = c.update(Some(Vec3::ZERO), cluster(Vec3::new(0.0, 0.0, 2.0), 50), DT);
        assert_eq!(hits, 0);
        assert_eq!(c.fire_intensity(), 1.0);
    }

    #[test]
    fn intensity_is_monotonic_and_floored() {
        let mut c = coupler();
        let anchor = Some(Vec3::ZERO);
        let foam = cluster(Vec3::ZERO, 10);
        let mut last = c.fire_intensity();
        for _ in 0..400 {
            c.update(anchor, foam.iter().copied(), DT);
            let now = c.fire_intensity();
            assert!(now <= last);
            assert!(now >= 0.0);
            last = now;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn missing_anchor_keeps_intensity() {
        let mut c = coupler();
        let foam = cluster(Vec3::ZERO, 10);
        for _ in 0..30 {
            assert_eq!(c.update(None, foam.iter().copied(), DT), 0);
        }
        assert_eq!(c.fire_intensity(), 1.0);
        assert_eq!(c.update(Some(Vec3::ZERO), foam.iter().copied(), DT), 10);
        assert!(c.fire_intensity() < 1.0);
    }

    #[test]
    fn reader_follows_coupler() {
        let mut c = coupler();
        let reader = c.intensity_reader();
        c.update(Some(Vec3::ZERO), cluster(Vec3::ZERO, 10), 1.0);
        assert!((reader.get() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn watch_fires_once() {
        let mut watch = ExtinguishWatch::new(0.05);
        assert!(watch.poll(0.5).is_none());
        assert_eq!(
            watch.poll(0.04),
            Some(TrainingEvent::FireExtinguished { intensity: 0.04 })
        );
        assert!(watch.poll(0.0).is_none());
        assert!(watch.has_fired());
    }
}
