//! Typed scene anchors shared between the scene collaborator and the core
//!
//! The scene owns placement of the fire, the extinguisher nozzle and the
//! camera. Systems read these once per tick instead of looking entities up
//! by name.

use crate::event::TrainingEvent;
use crate::event_bus::EventBus;
use quench_core::Vec3;

/// World-space pose of the extinguisher nozzle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nozzle {
    pub position: Vec3,
    /// Spray axis. Normalized on assignment.
    pub forward: Vec3,
}

impl Nozzle {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalized(),
        }
    }
}

/// Per-session scene state read by runtime systems each frame
pub struct SceneState {
    /// Viewer position, used for back-to-front sorting
    pub camera_position: Vec3,
    fire_anchor: Option<Vec3>,
    nozzle: Option<Nozzle>,
    /// Pending events, drained by the runner at the start of each frame
    pub events: EventBus,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            camera_position: Vec3::ZERO,
            fire_anchor: None,
            nozzle: None,
            events: EventBus::new(),
        }
    }

    /// Scene with the fire placed at `anchor`
    pub fn with_fire_anchor(mut self, anchor: Vec3) -> Self {
        self.fire_anchor = Some(anchor);
        self
    }

    pub fn with_nozzle(mut self, nozzle: Nozzle) -> Self {
        self.nozzle = Some(nozzle);
        self
    }

    pub fn with_camera(mut self, position: Vec3) -> Self {
        self.camera_position = position;
        self
    }

    pub fn fire_anchor(&self) -> Option<Vec3> {
        self.fire_anchor
    }

    pub fn nozzle(&self) -> Option<Nozzle> {
        self.nozzle
    }

    /// Move, place or remove the fire anchor. Appearance and removal are announced on the bus.
    pub fn set_fire_anchor(&mut self, anchor: Option<Vec3>) {
        if anchor.is_some() != self.fire_anchor.is_some() {
            self.events.push(TrainingEvent::AnchorChanged {
                name: "fire".into(),
                present: anchor.is_some(),
            });
        }
        self.fire_anchor = anchor;
    }

    /// Move, attach or detach the nozzle. Attachment changes are announced on the bus.
    pub fn set_nozzle(&mut self, nozzle: Option<Nozzle>) {
        if nozzle.is_some() != self.nozzle.is_some() {
            self.events.push(TrainingEvent::AnchorChanged {
                name: "nozzle".into(),
                present: nozzle.is_some(),
            });
        }
        self.nozzle = nozzle;
    }
}
