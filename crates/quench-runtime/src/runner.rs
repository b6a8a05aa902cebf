//! Ticks registered runtime systems in a fixed order

use crate::clock::GameClock;
use crate::scene::SceneState;
use crate::system::RuntimeSystem;
use quench_core::Result;

/// Owns the clock, the scene state and the registered systems.
///
/// Each frame: drain events and dispatch them to every system, then run as
/// many fixed steps as the clock owes. A failing system is logged and skipped
/// for that call; the frame continues.
pub struct SystemRunner {
    pub clock: GameClock,
    scene: SceneState,
    systems: Vec<Box<dyn RuntimeSystem>>,
    shut_down: bool,
}

impl SystemRunner {
    /// Runner on a 60 Hz clock
    pub fn new(scene: SceneState) -> Self {
        Self::with_clock(scene, GameClock::new())
    }

    pub fn with_clock(scene: SceneState, clock: GameClock) -> Self {
        Self {
            clock,
            scene,
            systems: Vec::new(),
            shut_down: false,
        }
    }

    /// Register and initialize a system. Systems tick in registration order.
    pub fn register(&mut self, mut system: Box<dyn RuntimeSystem>) -> Result<()> {
        system.initialize(&mut self.scene)?;
        log::info!("[runtime] Registered system '{}'", system.name());
        self.systems.push(system);
        Ok(())
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Run one frame covering `dt` seconds
    pub fn step(&mut self, dt: f64) {
        if self.shut_down {
            return;
        }
        self.clock.advance(dt);

        for event in self.scene.events.drain() {
            for system in &mut self.systems {
                if let Err(e) = system.on_event(&event) {
                    log::error!("[runtime] {} failed handling {:?}: {}", system.name(), event, e);
                }
            }
        }

        let fixed_dt = self.clock.fixed_timestep();
        for _ in 0..self.clock.take_fixed_steps() {
            for system in &mut self.systems {
                if let Err(e) = system.fixed_update(&mut self.scene, fixed_dt) {
                    log::error!("[runtime] {} fixed update failed: {}", system.name(), e);
                }
            }
        }
    }

    /// Shut every system down, even past a failure, and return the first error.
    /// Calling this more than once is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        let mut first_err = None;
        for system in &mut self.systems {
            if let Err(e) = system.shutdown() {
                log::error!("[runtime] {} shutdown failed: {}", system.name(), e);
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
