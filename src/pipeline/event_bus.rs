// src/pipeline/event_bus.rs
//
// Outbound HUD events. The render loop publishes; whoever owns the
// pipeline drains once per tick.

use crate::pipeline::pacer::SlowFrame;
use crate::types::Alert;
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum HudEvent {
    /// A new non-empty alert went up outside preview mode
    AlertActivated(Alert),

    SlowFrame(SlowFrame),
}

pub struct EventBus {
    events: VecDeque<HudEvent>,
    max_pending: usize,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending: max_pending.max(1),
        }
    }

    pub fn publish(&mut self, event: HudEvent) {
        if self.events.len() >= self.max_pending {
            warn!(
                "Event bus full ({} events), dropping oldest",
                self.max_pending
            );
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<HudEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slow(ms: f64) -> HudEvent {
        HudEvent::SlowFrame(SlowFrame { interval_ms: ms })
    }

    #[test]
    fn test_drops_oldest_when_full() {
        let mut bus = EventBus::new(2);
        bus.publish(slow(70.0));
        bus.publish(slow(80.0));
        bus.publish(slow(90.0));
        assert_eq!(bus.pending_count(), 2);
        assert_eq!(bus.drain(), vec![slow(80.0), slow(90.0)]);
        assert_eq!(bus.pending_count(), 0);
    }
}
