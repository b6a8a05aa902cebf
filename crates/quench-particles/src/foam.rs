//! Extinguisher foam: a cone spray that lands and spreads into puddles
//!
//! Each droplet is airborne until it first reaches the floor, then grounded
//! for the rest of its life.

use crate::config::{FoamConfig, RenderConfig};
use crate::curves::{airborne_alpha, grounded_alpha, puddle_scale, smooth_size};
use crate::emission::EmissionAccumulator;
use crate::geometry::GeometryBuffers;
use crate::particle::{pool_capacity, FoamParticle, ParticlePool};
use crate::rng::ParticleRng;
use quench_core::{Result, Vec3};
use quench_runtime::Nozzle;

/// Share of impact speed that turns into sideways splash
const SPLASH_FACTOR: f32 = 0.3;

pub struct FoamSystem {
    config: FoamConfig,
    pool: ParticlePool<FoamParticle>,
    accumulator: EmissionAccumulator,
    spraying: bool,
    warned_missing_nozzle: bool,
}

impl FoamSystem {
    pub fn new(config: &FoamConfig, render: &RenderConfig) -> Result<Self> {
        config.validate()?;
        render.validate()?;
        let capacity = pool_capacity(
            "foam",
            config.rate,
            config.life_max,
            render.pool_headroom,
            config.max_particles,
        )?;
        log::debug!("[foam] pool capacity {capacity}");
        Ok(Self {
            config: config.clone(),
            pool: ParticlePool::new(capacity),
            accumulator: EmissionAccumulator::new(),
            spraying: false,
            warned_missing_nozzle: false,
        })
    }

    /// Begin spawning. Idempotent.
    pub fn start(&mut self) {
        if !self.spraying {
            log::debug!("[foam] spray started");
        }
        self.spraying = true;
    }

    /// Stop spawning; droplets in flight finish their lives. Idempotent.
    pub fn stop(&mut self) {
        if self.spraying {
            log::debug!("[foam] spray stopped");
        }
        self.spraying = false;
        self.accumulator.reset();
    }

    pub fn is_spraying(&self) -> bool {
        self.spraying
    }

    pub fn config(&self) -> &FoamConfig {
        &self.config
    }

    pub fn alive_count(&self) -> usize {
        self.pool.alive_count()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn grounded_count(&self) -> usize {
        self.pool.alive_slice().iter().filter(|f| f.grounded).count()
    }

    pub fn particles(&self) -> &[FoamParticle] {
        self.pool.alive_slice()
    }

    /// Positions of every live droplet, for the suppression check
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.pool.alive_slice().iter().map(|f| f.particle.position)
    }

    pub fn update(&mut self, nozzle: Option<Nozzle>, rng: &mut ParticleRng, dt: f32) {
        if self.spraying {
            match nozzle {
                Some(nozzle) => {
                    self.warned_missing_nozzle = false;
                    let count = self.accumulator.accumulate(self.config.rate, dt);
                    for _ in 0..count {
                        if !self.spawn_one(nozzle, rng) {
                            break;
                        }
                    }
                }
                None => {
                    if !self.warned_missing_nozzle {
                        log::warn!("[foam] Spray requested but no nozzle is attached; skipping emission");
                        self.warned_missing_nozzle = true;
                    }
                    self.accumulator.reset();
                }
            }
        }

        let config = &self.config;
        for foam in self.pool.alive_slice_mut() {
            if foam.grounded {
                step_grounded(foam, config, dt);
            } else {
                step_airborne(foam, config, rng, dt);
            }

            let p = &mut foam.particle;
            p.rotation += p.rotation_rate * dt;
            p.life -= dt;
            if p.is_expired() {
                continue;
            }

            let age = p.age();
            let size = smooth_size(config.size_start, config.size_end, age);
            if foam.grounded {
                p.current_size = size
                    * puddle_scale(foam.ground_time, config.puddle_growth, config.puddle_max_scale);
                p.alpha = grounded_alpha(p.life, p.max_life, config.grounded_alpha_scale);
            } else {
                p.current_size = size;
                p.alpha = airborne_alpha(age);
            }
        }

        self.pool.compact();
    }

    /// Place one droplet directly, bypassing the nozzle. Returns false when
    /// the pool is full or `life` is not positive.
    pub fn inject(&mut self, position: Vec3, velocity: Vec3, life: f32) -> bool {
        if life.is_nan() || life <= 0.0 {
            return false;
        }
        let size = self.config.size_start;
        let color = self.config.color;
        let Some(foam) = self.pool.spawn() else {
            return false;
        };
        let p = &mut foam.particle;
        p.position = position;
        p.velocity = velocity;
        p.life = life;
        p.max_life = life;
        p.size = size;
        p.current_size = size;
        p.color = color;
        true
    }

    fn spawn_one(&mut self, nozzle: Nozzle, rng: &mut ParticleRng) -> bool {
        let config = &self.config;
        let origin = nozzle.position + rng.disc_offset(nozzle.forward, config.nozzle_radius);
        let direction = rng.cone_direction(nozzle.forward, config.cone_angle);
        let speed = config.speed * rng.range(1.0 - config.speed_jitter, 1.0 + config.speed_jitter);
        let life = rng.range(config.life_min, config.life_max);
        let rotation = rng.range(0.0, std::f32::consts::TAU);
        let rotation_rate = rng.signed(config.rotation_rate_max);
        let size = config.size_start;
        let color = config.color;

        let Some(foam) = self.pool.spawn() else {
            return false;
        };
        let p = &mut foam.particle;
        p.position = origin;
        p.velocity = direction * speed;
        p.life = life;
        p.max_life = life;
        p.size = size;
        p.current_size = size;
        p.color = color;
        p.rotation = rotation;
        p.rotation_rate = rotation_rate;
        true
    }

    pub fn write_geometry(&self, buffers: &mut GeometryBuffers) {
        buffers.write(self.pool.alive_slice().iter().map(|f| &f.particle));
    }

    /// Free the pool. Idempotent.
    pub fn release(&mut self) {
        self.pool.release();
        self.accumulator.reset();
        self.spraying = false;
    }
}

fn step_airborne(foam: &mut FoamParticle, config: &FoamConfig, rng: &mut ParticleRng, dt: f32) {
    let p = &mut foam.particle;
    let age = p.age();

    p.velocity.y += config.gravity * dt;
    p.velocity *= (1.0 - config.drag * dt).max(0.0);

    let t = config.turbulence;
    p.velocity += Vec3::new(rng.signed(t), rng.signed(t * 0.5), rng.signed(t)) * dt;

    if age > config.spread_age_threshold {
        let push = config.spread_strength * (age - config.spread_age_threshold) * dt;
        p.velocity += rng.horizontal_direction() * push;
    }

    p.position += p.velocity * dt;

    if p.position.y <= config.floor_y {
        p.position.y = config.floor_y + config.floor_epsilon;
        foam.grounded = true;

        let impact = p.velocity.y.abs();
        let splash = impact * config.ground_spread * SPLASH_FACTOR;
        let dir = rng.horizontal_direction();
        p.velocity.x += dir.x * splash;
        p.velocity.z += dir.z * splash;
        p.velocity.y = impact * config.restitution;
    }
}

fn step_grounded(foam: &mut FoamParticle, config: &FoamConfig, dt: f32) {
    foam.ground_time += dt;
    let p = &mut foam.particle;
    let damp = (1.0 - config.ground_drag * dt).max(0.0);

    p.velocity.y = 0.0;
    p.velocity.x *= damp;
    p.velocity.z *= damp;
    p.position.x += p.velocity.x * dt;
    p.position.z += p.velocity.z * dt;
    p.position.y = config.floor_y + config.floor_epsilon;
    p.rotation_rate *= damp;
}
