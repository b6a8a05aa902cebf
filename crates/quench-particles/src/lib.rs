//! Quench Particles - Fire, smoke and foam for extinguisher training
//!
//! Provides pooled particle simulation with:
//! - Three intensity-driven plumes (flame, rising smoke, ceiling smoke) and a fire light
//! - A foam spray that lands, spreads and puddles
//! - Foam-on-fire suppression through a shared fire intensity
//! - Flat render buffers per system for GPU upload

pub mod config;
pub mod curves;
pub mod emission;
pub mod fire;
pub mod foam;
pub mod geometry;
pub mod intensity;
pub mod particle;
pub mod plume;
pub mod rng;
pub mod suppression;

use std::cell::Cell;
use std::rc::Rc;

use quench_core::Result;
use quench_runtime::{RuntimeSystem, SceneState, TrainingEvent};
use serde::Serialize;

pub use config::SimulationConfig;
pub use fire::{FireLight, FireSystem};
pub use foam::FoamSystem;
pub use geometry::GeometryBuffers;
pub use intensity::{FireIntensity, IntensityReader};
pub use particle::{FoamParticle, Particle, ParticlePool};
pub use plume::PlumeSystem;
pub use rng::ParticleRng;
pub use suppression::{ExtinguishWatch, SuppressionCoupler};

/// Per-tick snapshot of the simulation, for HUDs and headless reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimulationStats {
    /// Simulated seconds since construction
    pub time: f64,
    pub fire_intensity: f32,
    pub light_intensity: f32,
    pub flame: usize,
    pub rising_smoke: usize,
    pub ceiling_smoke: usize,
    pub foam: usize,
    pub grounded_foam: usize,
    /// Foam droplets inside the detection radius
    pub foam_on_fire: usize,
    pub spraying: bool,
    pub extinguished: bool,
}

/// Read-only view of the latest [`SimulationStats`]
#[derive(Debug, Clone)]
pub struct StatsReader {
    inner: Rc<Cell<SimulationStats>>,
}

impl StatsReader {
    pub fn get(&self) -> SimulationStats {
        self.inner.get()
    }
}

/// Render buffers for every particle system
pub struct RenderBuffers {
    pub flame: GeometryBuffers,
    pub rising_smoke: GeometryBuffers,
    pub ceiling_smoke: GeometryBuffers,
    pub foam: GeometryBuffers,
}

impl RenderBuffers {
    fn release(&mut self) {
        self.flame.release();
        self.rising_smoke.release();
        self.ceiling_smoke.release();
        self.foam.release();
    }
}

/// The whole training simulation: fire, foam and the coupling between them.
/// Implements RuntimeSystem for integration with the frame loop.
pub struct TrainingSimulation {
    fire: FireSystem,
    foam: FoamSystem,
    coupler: SuppressionCoupler,
    watch: ExtinguishWatch,
    buffers: RenderBuffers,
    rng: ParticleRng,
    stats: Rc<Cell<SimulationStats>>,
    elapsed: f64,
    disposed: bool,
}

impl TrainingSimulation {
    /// Build every system and allocate all pools and buffers. The config is validated first.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_rng(config, ParticleRng::from_entropy())
    }

    pub fn with_rng(config: SimulationConfig, rng: ParticleRng) -> Result<Self> {
        config.validate()?;

        let coupler = SuppressionCoupler::new(&config.suppression)?;
        let fire = FireSystem::new(&config.fire, &config.render, coupler.intensity_reader())?;
        let foam = FoamSystem::new(&config.foam, &config.render)?;

        let buffers = RenderBuffers {
            flame: GeometryBuffers::with_capacity(fire.flame().capacity()),
            rising_smoke: GeometryBuffers::with_capacity(fire.rising_smoke().capacity()),
            ceiling_smoke: GeometryBuffers::with_capacity(fire.ceiling_smoke().capacity()),
            foam: GeometryBuffers::with_capacity(foam.capacity()),
        };

        let mut sim = Self {
            watch: ExtinguishWatch::new(config.suppression.extinguish_threshold),
            fire,
            foam,
            coupler,
            buffers,
            rng,
            stats: Rc::new(Cell::new(SimulationStats::default())),
            elapsed: 0.0,
            disposed: false,
        };
        sim.publish_stats();
        Ok(sim)
    }

    /// One simulation step: suppression check, fire, foam, then the extinguish watch
    pub fn tick(&mut self, scene: &mut SceneState, dt: f32) {
        if self.disposed {
            return;
        }
        let anchor = scene.fire_anchor();
        let camera = scene.camera_position;

        self.coupler.update(anchor, self.foam.positions(), dt);

        self.fire.update(anchor, camera, &mut self.rng, dt);
        self.fire.write_geometry(
            &mut self.buffers.flame,
            &mut self.buffers.rising_smoke,
            &mut self.buffers.ceiling_smoke,
        );

        self.foam.update(scene.nozzle(), &mut self.rng, dt);
        self.foam.write_geometry(&mut self.buffers.foam);

        if let Some(event) = self.watch.poll(self.coupler.fire_intensity()) {
            log::info!(
                "[quench] Fire extinguished after {:.2}s",
                self.elapsed + dt as f64
            );
            scene.events.push(event);
        }

        self.elapsed += dt as f64;
        self.publish_stats();
    }

    pub fn start_spray(&mut self) {
        if !self.disposed {
            self.foam.start();
        }
    }

    pub fn stop_spray(&mut self) {
        self.foam.stop();
    }

    pub fn is_spraying(&self) -> bool {
        self.foam.is_spraying()
    }

    pub fn fire_intensity(&self) -> f32 {
        self.coupler.fire_intensity()
    }

    pub fn intensity_reader(&self) -> IntensityReader {
        self.coupler.intensity_reader()
    }

    pub fn light_intensity(&self) -> f32 {
        self.fire.light_intensity()
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats.get()
    }

    pub fn stats_reader(&self) -> StatsReader {
        StatsReader {
            inner: Rc::clone(&self.stats),
        }
    }

    pub fn fire(&self) -> &FireSystem {
        &self.fire
    }

    pub fn foam(&self) -> &FoamSystem {
        &self.foam
    }

    /// Direct foam access for scripted placement
    pub fn foam_mut(&mut self) -> &mut FoamSystem {
        &mut self.foam
    }

    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every pool and render buffer. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.fire.release();
        self.foam.release();
        self.buffers.release();
        self.disposed = true;
        self.publish_stats();
        log::info!("[quench] Released particle pools and render buffers");
    }

    fn publish_stats(&self) {
        self.stats.set(SimulationStats {
            time: self.elapsed,
            fire_intensity: self.coupler.fire_intensity(),
            light_intensity: self.fire.light_intensity(),
            flame: self.fire.flame().alive_count(),
            rising_smoke: self.fire.rising_smoke().alive_count(),
            ceiling_smoke: self.fire.ceiling_smoke().alive_count(),
            foam: self.foam.alive_count(),
            grounded_foam: self.foam.grounded_count(),
            foam_on_fire: self.coupler.hits_last_tick(),
            spraying: self.foam.is_spraying(),
            extinguished: self.watch.has_fired(),
        });
    }
}

impl RuntimeSystem for TrainingSimulation {
    fn initialize(&mut self, scene: &mut SceneState) -> Result<()> {
        match scene.fire_anchor() {
            Some(a) => log::info!("[quench] Fire anchored at ({:.2}, {:.2}, {:.2})", a.x, a.y, a.z),
            None => log::info!("[quench] No fire anchor yet; fire stays dormant until one is placed"),
        }
        if scene.nozzle().is_none() {
            log::info!("[quench] No nozzle attached yet");
        }
        let plumes = self.fire.plumes();
        let capacity: usize = plumes.iter().map(|p| p.capacity()).sum();
        log::info!(
            "[quench] Allocated {} fire/smoke and {} foam particle slots",
            capacity,
            self.foam.capacity()
        );
        Ok(())
    }

    fn fixed_update(&mut self, scene: &mut SceneState, dt: f64) -> Result<()> {
        self.tick(scene, dt as f32);
        Ok(())
    }

    fn on_event(&mut self, event: &TrainingEvent) -> Result<()> {
        match event {
            TrainingEvent::SprayStarted => self.start_spray(),
            TrainingEvent::SprayStopped => self.stop_spray(),
            TrainingEvent::FireExtinguished { intensity } => {
                log::debug!("[quench] Extinguish acknowledged at intensity {intensity:.3}");
            }
            TrainingEvent::AnchorChanged { name, present } => {
                log::debug!("[quench] Anchor '{name}' present: {present}");
            }
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.dispose();
        Ok(())
    }

    fn name(&self) -> &str {
        "quench"
    }
}
