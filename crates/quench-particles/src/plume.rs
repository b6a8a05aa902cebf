//! Flame and smoke emitters
//!
//! Flame, rising smoke and ceiling smoke are the same system with different
//! settings. Where particles appear and what happens at the edge of their
//! region are pluggable policies.

use crate::config::{BoundaryConfig, PlumeConfig, RenderConfig, SpawnGeometryConfig};
use crate::emission::EmissionAccumulator;
use crate::geometry::GeometryBuffers;
use crate::intensity::IntensityReader;
use crate::particle::{pool_capacity, Particle, ParticlePool};
use crate::rng::ParticleRng;
use quench_core::{Lerp, Result, Rgb, Spline, Vec3};

/// Picks spawn positions relative to the fire anchor
pub trait SpawnGeometry {
    fn sample(&self, anchor: Vec3, rng: &mut ParticleRng) -> Vec3;
}

/// Adjusts a particle's velocity (and position) at the region boundary, before it moves
pub trait BoundaryBehavior {
    fn apply(&self, particle: &mut Particle, anchor: Vec3, dt: f32);
}

pub struct VolumeSpawn {
    pub offset: Vec3,
    pub half_extents: Vec3,
}

impl SpawnGeometry for VolumeSpawn {
    fn sample(&self, anchor: Vec3, rng: &mut ParticleRng) -> Vec3 {
        anchor + self.offset + rng.in_box(self.half_extents)
    }
}

pub struct CeilingBandSpawn {
    pub height: f32,
    pub width: f32,
    pub depth: f32,
}

impl SpawnGeometry for CeilingBandSpawn {
    fn sample(&self, anchor: Vec3, rng: &mut ParticleRng) -> Vec3 {
        Vec3::new(
            anchor.x + rng.signed(self.width * 0.5),
            self.height,
            anchor.z + rng.signed(self.depth * 0.5),
        )
    }
}

pub struct OpenAir;

impl BoundaryBehavior for OpenAir {
    fn apply(&self, _particle: &mut Particle, _anchor: Vec3, _dt: f32) {}
}

/// Keeps ceiling smoke inside the room around the anchor and pulls it back to the ceiling
pub struct CeilingBounds {
    pub height: f32,
    pub half_width: f32,
    pub half_depth: f32,
    pub wall_damping: f32,
    pub restoring_strength: f32,
}

impl BoundaryBehavior for CeilingBounds {
    fn apply(&self, particle: &mut Particle, anchor: Vec3, dt: f32) {
        reflect_axis(
            &mut particle.position.x,
            &mut particle.velocity.x,
            anchor.x - self.half_width,
            anchor.x + self.half_width,
            self.wall_damping,
        );
        reflect_axis(
            &mut particle.position.z,
            &mut particle.velocity.z,
            anchor.z - self.half_depth,
            anchor.z + self.half_depth,
            self.wall_damping,
        );
        particle.velocity.y += (self.height - particle.position.y) * self.restoring_strength * dt;
    }
}

/// Clamp into [min, max]; an outward-moving component is negated and damped
fn reflect_axis(position: &mut f32, velocity: &mut f32, min: f32, max: f32, damping: f32) {
    if *position < min {
        *position = min;
        if *velocity < 0.0 {
            *velocity = -*velocity * damping;
        }
    } else if *position > max {
        *position = max;
        if *velocity > 0.0 {
            *velocity = -*velocity * damping;
        }
    }
}

impl SpawnGeometryConfig {
    pub fn build(&self) -> Box<dyn SpawnGeometry> {
        match *self {
            SpawnGeometryConfig::Volume {
                offset,
                half_extents,
            } => Box::new(VolumeSpawn {
                offset,
                half_extents,
            }),
            SpawnGeometryConfig::CeilingBand {
                height,
                width,
                depth,
            } => Box::new(CeilingBandSpawn {
                height,
                width,
                depth,
            }),
        }
    }
}

impl BoundaryConfig {
    pub fn build(&self) -> Box<dyn BoundaryBehavior> {
        match *self {
            BoundaryConfig::OpenAir => Box::new(OpenAir),
            BoundaryConfig::Ceiling {
                height,
                half_width,
                half_depth,
                wall_damping,
                restoring_strength,
            } => Box::new(CeilingBounds {
                height,
                half_width,
                half_depth,
                wall_damping,
                restoring_strength,
            }),
        }
    }
}

/// One pooled, intensity-driven flame or smoke emitter
pub struct PlumeSystem {
    name: String,
    config: PlumeConfig,
    spawn: Box<dyn SpawnGeometry>,
    boundary: Box<dyn BoundaryBehavior>,
    size_curve: Spline<f32>,
    alpha_curve: Spline<f32>,
    color_normal: Spline<Rgb>,
    color_suppressed: Spline<Rgb>,
    pool: ParticlePool<Particle>,
    accumulator: EmissionAccumulator,
    intensity: IntensityReader,
    sort_interval: u32,
    ticks_since_sort: u32,
    emitting: bool,
    last_anchor: Option<Vec3>,
}

impl PlumeSystem {
    pub fn new(
        name: impl Into<String>,
        config: &PlumeConfig,
        render: &RenderConfig,
        intensity: IntensityReader,
    ) -> Result<Self> {
        let name = name.into();
        config.validate(&name)?;
        render.validate()?;

        let capacity = pool_capacity(
            &name,
            config.rate,
            config.life_max,
            render.pool_headroom,
            config.max_particles,
        )?;
        log::debug!("[{name}] pool capacity {capacity}");

        Ok(Self {
            spawn: config.spawn.build(),
            boundary: config.boundary.build(),
            size_curve: config.size_spline()?,
            alpha_curve: config.alpha_spline()?,
            color_normal: config.normal_color_spline()?,
            color_suppressed: config.suppressed_color_spline()?,
            pool: ParticlePool::new(capacity),
            accumulator: EmissionAccumulator::new(),
            intensity,
            sort_interval: render.sort_interval,
            ticks_since_sort: 0,
            emitting: true,
            last_anchor: None,
            config: config.clone(),
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PlumeConfig {
        &self.config
    }

    /// Spawn rate after the fire-intensity response
    pub fn effective_rate(&self) -> f32 {
        self.config
            .intensity_response
            .effective_rate(self.config.rate, self.intensity.get())
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Gate spawning. Particles already alive keep simulating.
    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.alive_slice()
    }

    /// Most recent fire anchor seen by `update`
    pub fn last_anchor(&self) -> Option<Vec3> {
        self.last_anchor
    }

    /// Spawn, integrate, derive visuals, release expired and periodically depth-sort.
    ///
    /// Without an anchor nothing spawns; live particles keep moving relative to the last known anchor.
    pub fn update(&mut self, anchor: Option<Vec3>, camera: Vec3, rng: &mut ParticleRng, dt: f32) {
        let intensity = self.intensity.get();

        match anchor {
            Some(anchor) if self.emitting => {
                self.last_anchor = Some(anchor);
                let rate = self.effective_rate();
                let count = self.accumulator.accumulate(rate, dt);
                for _ in 0..count {
                    if !self.spawn_one(anchor, rng) {
                        break;
                    }
                }
            }
            Some(anchor) => {
                self.last_anchor = Some(anchor);
                self.accumulator.reset();
            }
            None => self.accumulator.reset(),
        }

        let region_anchor = self.last_anchor.unwrap_or(Vec3::ZERO);
        let config = &self.config;
        let suppression = 1.0 - intensity;

        for p in self.pool.alive_slice_mut() {
            let perturbation = Vec3::new(
                rng.signed(config.perturbation),
                rng.signed(config.perturbation),
                rng.signed(config.perturbation),
            );
            p.velocity += config.drift * dt + perturbation * dt;
            self.boundary.apply(p, region_anchor, dt);
            p.position += p.velocity * dt;
            p.rotation += p.rotation_rate * dt;
            p.life -= dt;

            if p.is_expired() {
                continue;
            }

            let age = p.age();
            p.current_size = p.size * self.size_curve.evaluate(age);
            p.alpha = self.alpha_curve.evaluate(age).clamp(0.0, 1.0);
            let normal = self.color_normal.evaluate(age);
            let suppressed = self.color_suppressed.evaluate(age);
            p.color = normal.lerp(&suppressed, suppression);
        }

        self.pool.compact();

        self.ticks_since_sort += 1;
        if self.ticks_since_sort >= self.sort_interval {
            self.ticks_since_sort = 0;
            self.sort_back_to_front(camera);
        }
    }

    /// Farthest from the camera first
    pub fn sort_back_to_front(&mut self, camera: Vec3) {
        self.pool.alive_slice_mut().sort_by(|a, b| {
            let da = a.position.distance_squared(&camera);
            let db = b.position.distance_squared(&camera);
            db.total_cmp(&da)
        });
    }

    /// Returns false when the pool is full
    fn spawn_one(&mut self, anchor: Vec3, rng: &mut ParticleRng) -> bool {
        let config = &self.config;
        let position = self.spawn.sample(anchor, rng);
        let life = rng.range(config.life_min, config.life_max);
        let size = rng.range(config.size_min, config.size_max);
        let jitter = config.velocity_jitter;
        let velocity = config.initial_velocity
            + Vec3::new(rng.signed(jitter), rng.signed(jitter), rng.signed(jitter));
        let rotation = rng.range(0.0, std::f32::consts::TAU);
        let rotation_rate = rng.signed(config.rotation_rate_max);

        let Some(p) = self.pool.spawn() else {
            return false;
        };
        p.position = position;
        p.velocity = velocity;
        p.life = life;
        p.max_life = life;
        p.size = size;
        p.current_size = size * self.size_curve.evaluate(0.0);
        p.alpha = self.alpha_curve.evaluate(0.0);
        p.color = self.color_normal.evaluate(0.0);
        p.rotation = rotation;
        p.rotation_rate = rotation_rate;
        true
    }

    pub fn write_geometry(&self, buffers: &mut GeometryBuffers) {
        buffers.write(self.pool.alive_slice());
    }

    /// Free the pool. Idempotent.
    pub fn release(&mut self) {
        self.pool.release();
        self.accumulator.reset();
    }
}
