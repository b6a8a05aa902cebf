//! Quench Runtime - Frame loop infrastructure
//!
//! Provides the building blocks that drive the simulation each frame:
//! - `GameClock` - fixed-step budget fed by frame deltas
//! - `TrainingEvent` / `EventBus` - typed event queue between the UI and the core
//! - `SceneState` - typed anchors owned by the scene collaborator
//! - `RuntimeSystem` - trait for systems ticked by the frame loop
//! - `SystemRunner` - ticks registered systems in order

mod clock;
mod event;
mod event_bus;
mod runner;
mod scene;
mod system;

pub use clock::GameClock;
pub use event::TrainingEvent;
pub use event_bus::EventBus;
pub use runner::SystemRunner;
pub use scene::{Nozzle, SceneState};
pub use system::RuntimeSystem;
