//! The fire: flame core, rising smoke, ceiling smoke and a flickering light

use crate::config::{FireConfig, LightConfig, RenderConfig};
use crate::geometry::GeometryBuffers;
use crate::intensity::IntensityReader;
use crate::plume::PlumeSystem;
use crate::rng::ParticleRng;
use quench_core::{Result, Vec3};

/// Flickering point light tied to the fire intensity. Purely cosmetic.
pub struct FireLight {
    config: LightConfig,
    time: f32,
    current: f32,
}

impl FireLight {
    pub fn new(config: LightConfig) -> Self {
        Self {
            config,
            time: 0.0,
            current: 0.0,
        }
    }

    /// Advance the flicker and return the new light intensity
    pub fn update(&mut self, dt: f32, fire_intensity: f32, rng: &mut ParticleRng) -> f32 {
        self.time += dt;
        let c = &self.config;
        let flicker = 1.0
            + c.flicker_amplitude * (self.time * c.flicker_frequency).sin()
            + rng.signed(c.jitter);
        self.current = (c.base_intensity * fire_intensity * flicker).max(0.0);
        self.current
    }

    pub fn intensity(&self) -> f32 {
        self.current
    }
}

pub struct FireSystem {
    flame: PlumeSystem,
    rising_smoke: PlumeSystem,
    ceiling_smoke: PlumeSystem,
    light: FireLight,
    intensity: IntensityReader,
}

impl FireSystem {
    pub fn new(config: &FireConfig, render: &RenderConfig, intensity: IntensityReader) -> Result<Self> {
        Ok(Self {
            flame: PlumeSystem::new("flame", &config.flame, render, intensity.clone())?,
            rising_smoke: PlumeSystem::new(
                "rising_smoke",
                &config.rising_smoke,
                render,
                intensity.clone(),
            )?,
            ceiling_smoke: PlumeSystem::new(
                "ceiling_smoke",
                &config.ceiling_smoke,
                render,
                intensity.clone(),
            )?,
            light: FireLight::new(config.light.clone()),
            intensity,
        })
    }

    pub fn update(&mut self, anchor: Option<Vec3>, camera: Vec3, rng: &mut ParticleRng, dt: f32) {
        self.flame.update(anchor, camera, rng, dt);
        self.rising_smoke.update(anchor, camera, rng, dt);
        self.ceiling_smoke.update(anchor, camera, rng, dt);
        self.light.update(dt, self.intensity.get(), rng);
    }

    pub fn write_geometry(
        &self,
        flame: &mut GeometryBuffers,
        rising_smoke: &mut GeometryBuffers,
        ceiling_smoke: &mut GeometryBuffers,
    ) {
        self.flame.write_geometry(flame);
        self.rising_smoke.write_geometry(rising_smoke);
        self.ceiling_smoke.write_geometry(ceiling_smoke);
    }

    pub fn flame(&self) -> &PlumeSystem {
        &self.flame
    }

    pub fn rising_smoke(&self) -> &PlumeSystem {
        &self.rising_smoke
    }

    pub fn ceiling_smoke(&self) -> &PlumeSystem {
        &self.ceiling_smoke
    }

    pub fn plumes(&self) -> [&PlumeSystem; 3] {
        [&self.flame, &self.rising_smoke, &self.ceiling_smoke]
    }

    pub fn light_intensity(&self) -> f32 {
        self.light.intensity()
    }

    pub fn alive_count(&self) -> usize {
        self.plumes().iter().map(|p| p.alive_count()).sum()
    }

    pub fn release(&mut self) {
        self.flame.release();
        self.rising_smoke.release();
        self.ceiling_smoke.release();
    }
}
