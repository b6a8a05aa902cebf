//! Events exchanged between the training UI and the simulation core

use serde::{Deserialize, Serialize};

/// An event pushed onto the [`EventBus`](crate::EventBus)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainingEvent {
    /// The trainee pressed the spray control
    SprayStarted,
    /// The trainee released the spray control
    SprayStopped,
    /// Fire intensity dropped below the extinguish threshold
    FireExtinguished { intensity: f32 },
    /// The scene lost or regained a collaborator anchor
    AnchorChanged { name: String, present: bool },
}
