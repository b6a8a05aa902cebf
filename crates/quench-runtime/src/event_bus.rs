//! FIFO queue of training events

use crate::event::TrainingEvent;
use std::collections::VecDeque;

/// Events raised by the UI or by systems, delivered to every system at the
/// start of the next frame in arrival order.
#[derive(Debug, Default)]
pub struct EventBus {
    pending: VecDeque<TrainingEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TrainingEvent) {
        log::trace!("[runtime] queued {:?}", event);
        self.pending.push_back(event);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<TrainingEvent> {
        self.pending.drain(..).collect()
    }

    pub fn peek(&self) -> Option<&TrainingEvent> {
        self.pending.front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_come_out_in_arrival_order() {
        let mut bus = EventBus::new();
        bus.push(TrainingEvent::SprayStarted);
        bus.push(TrainingEvent::SprayStopped);
        assert_eq!(bus.peek(), Some(&TrainingEvent::SprayStarted));

        let drained = bus.drain();
        assert_eq!(
            drained,
            vec![TrainingEvent::SprayStarted, TrainingEvent::SprayStopped]
        );
        assert!(bus.is_empty());
        assert_eq!(bus.len(), 0);
    }
}
