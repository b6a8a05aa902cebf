//! The contract between the frame loop and a simulation component

use crate::event::TrainingEvent;
use crate::scene::SceneState;
use quench_core::Result;

/// A component driven by [`SystemRunner`](crate::SystemRunner).
///
/// Within a frame the runner delivers queued events first, then every fixed
/// step the clock owes.
pub trait RuntimeSystem {
    /// Runs once at registration, before any frame
    fn initialize(&mut self, scene: &mut SceneState) -> Result<()>;

    /// Constant-rate step; `dt` is the clock's fixed timestep
    fn fixed_update(&mut self, scene: &mut SceneState, dt: f64) -> Result<()>;

    fn on_event(&mut self, _event: &TrainingEvent) -> Result<()> {
        Ok(())
    }

    /// Release resources. The runner calls this at most once.
    fn shutdown(&mut self) -> Result<()>;

    /// Label used in log lines
    fn name(&self) -> &str;
}
