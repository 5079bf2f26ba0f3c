// src/pipeline/pacer.rs
//
// Wall-clock spacing between paint completions. Advisory only: a slow
// frame is logged and reported, never corrected.

use std::time::Instant;
use tracing::warn;

/// A paint interval over the budget.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SlowFrame {
    pub interval_ms: f64,
}

pub struct FramePacer {
    slow_frame_ms: f64,
    last_paint: Option<Instant>,
}

impl FramePacer {
    pub fn new(slow_frame_ms: f64) -> Self {
        Self {
            slow_frame_ms,
            last_paint: None,
        }
    }

    /// Record a paint finishing at `now`. The first paint only arms the pacer.
    pub fn paint_done(&mut self, now: Instant) -> Option<SlowFrame> {
        let previous = self.last_paint.replace(now)?;
        let interval_ms = now.saturating_duration_since(previous).as_secs_f64() * 1000.0;
        if interval_ms > self.slow_frame_ms {
            warn!("slow frame time: {:.2} ms", interval_ms);
            return Some(SlowFrame { interval_ms });
        }
        None
    }

    pub fn reset(&mut self) {
        self.last_paint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_paint_never_slow() {
        let mut pacer = FramePacer::new(66.0);
        assert_eq!(pacer.paint_done(Instant::now()), None);
    }

    #[test]
    fn test_interval_over_budget_reported() {
        let mut pacer = FramePacer::new(66.0);
        let t0 = Instant::now();
        pacer.paint_done(t0);
        assert_eq!(pacer.paint_done(t0 + Duration::from_millis(50)), None);
        let slow = pacer.paint_done(t0 + Duration::from_millis(150)).unwrap();
        assert!((slow.interval_ms - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_exact_budget_is_not_slow() {
        let mut pacer = FramePacer::new(66.0);
        let t0 = Instant::now();
        pacer.paint_done(t0);
        assert_eq!(pacer.paint_done(t0 + Duration::from_millis(66)), None);
    }

    #[test]
    fn test_reset_rearms() {
        let mut pacer = FramePacer::new(66.0);
        let t0 = Instant::now();
        pacer.paint_done(t0);
        pacer.reset();
        assert_eq!(pacer.paint_done(t0 + Duration::from_secs(5)), None);
    }
}
