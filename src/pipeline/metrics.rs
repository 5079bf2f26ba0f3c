// src/pipeline/metrics.rs
//
// Render-loop counters. Cheap to clone and share with a reporting task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct HudMetrics {
    pub total_frames: Arc<AtomicU64>,
    pub alerts_activated: Arc<AtomicU64>,
    pub banner_repaints: Arc<AtomicU64>,
    pub slow_frames: Arc<AtomicU64>,
    pub render_errors: Arc<AtomicU64>,
    /// Last render pass, microseconds
    pub render_time_us: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl Default for HudMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl HudMetrics {
    pub fn new() -> Self {
        Self {
            total_frames: Arc::new(AtomicU64::new(0)),
            alerts_activated: Arc::new(AtomicU64::new(0)),
            banner_repaints: Arc::new(AtomicU64::new(0)),
            slow_frames: Arc::new(AtomicU64::new(0)),
            render_errors: Arc::new(AtomicU64::new(0)),
            render_time_us: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub fn set_timing(&self, counter: &AtomicU64, duration_us: u64) {
        counter.store(duration_us, Ordering::Relaxed);
    }

    pub fn fps(&self) -> f64 {
        let frames = self.total_frames.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames.load(Ordering::Relaxed),
            fps: self.fps(),
            alerts_activated: self.alerts_activated.load(Ordering::Relaxed),
            banner_repaints: self.banner_repaints.load(Ordering::Relaxed),
            slow_frames: self.slow_frames.load(Ordering::Relaxed),
            render_errors: self.render_errors.load(Ordering::Relaxed),
            last_render_us: self.render_time_us.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub fps: f64,
    pub alerts_activated: u64,
    pub banner_repaints: u64,
    pub slow_frames: u64,
    pub render_errors: u64,
    pub last_render_us: u64,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = HudMetrics::new();
        let shared = metrics.clone();
        metrics.inc(&metrics.total_frames);
        shared.add(&shared.render_errors, 3);
        let summary = metrics.summary();
        assert_eq!(summary.total_frames, 1);
        assert_eq!(summary.render_errors, 3);
    }
}
