// src/pipeline/orchestrator.rs
//
// One HUD tick: alert state -> derived values -> paint -> pacing. Owns all
// state that survives between frames.

use std::time::Instant;

use tracing::debug;

use crate::alert::{AlertNotifier, AlertStateMachine, AlertUpdate, NullNotifier};
use crate::config::HudConfig;
use crate::hud::{HudDeriver, HudValues};
use crate::pipeline::event_bus::{EventBus, HudEvent};
use crate::pipeline::metrics::HudMetrics;
use crate::pipeline::pacer::{FramePacer, SlowFrame};
use crate::render::{Canvas, HudControl, OverlayRenderer, RenderReport, VideoFrame};
use crate::types::{Alert, Point2, SceneSnapshot};

const MAX_PENDING_EVENTS: usize = 64;

/// Forwards activations to the downstream notifier and onto the bus.
struct BusNotifier<'a> {
    bus: &'a mut EventBus,
    metrics: &'a HudMetrics,
    inner: &'a mut dyn AlertNotifier,
}

impl AlertNotifier for BusNotifier<'_> {
    fn alert_activated(&mut self, alert: &Alert) {
        self.metrics.inc(&self.metrics.alerts_activated);
        self.inner.alert_activated(alert);
        self.bus.publish(HudEvent::AlertActivated(alert.clone()));
    }
}

/// What one tick produced.
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub alert: AlertUpdate,
    pub values: HudValues,
    pub report: RenderReport,
    pub slow_frame: Option<SlowFrame>,
}

pub struct HudPipeline {
    alerts: AlertStateMachine,
    deriver: HudDeriver,
    renderer: OverlayRenderer,
    pacer: FramePacer,
    events: EventBus,
    metrics: HudMetrics,
    notifier: Box<dyn AlertNotifier + Send>,
}

impl HudPipeline {
    pub fn new(config: &HudConfig) -> Self {
        Self {
            alerts: AlertStateMachine::new(config.pacing.ui_freq),
            deriver: HudDeriver::new(config.pacing.throttle_frames()),
            renderer: OverlayRenderer::from_config(config),
            pacer: FramePacer::new(config.pacing.slow_frame_ms),
            events: EventBus::new(MAX_PENDING_EVENTS),
            metrics: HudMetrics::new(),
            notifier: Box::new(NullNotifier),
        }
    }

    /// Downstream consumer of "alert became active" (sound, haptics).
    pub fn with_notifier(mut self, notifier: Box<dyn AlertNotifier + Send>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn tick(
        &mut self,
        canvas: &mut dyn Canvas,
        frame: Option<&VideoFrame>,
        snapshot: &SceneSnapshot,
    ) -> FrameOutcome {
        let alert = {
            let mut notifier = BusNotifier {
                bus: &mut self.events,
                metrics: &self.metrics,
                inner: self.notifier.as_mut(),
            };
            self.alerts.update(snapshot, &mut notifier)
        };
        if alert.repaint {
            self.metrics.inc(&self.metrics.banner_repaints);
        }

        let values = self.deriver.derive(snapshot, &alert.alert);

        let started = Instant::now();
        let report = self.renderer.render(canvas, frame, snapshot, &values, &alert);
        let finished = Instant::now();
        self.metrics.set_timing(
            &self.metrics.render_time_us,
            finished.duration_since(started).as_micros() as u64,
        );
        if report.failed_elements > 0 {
            debug!("Frame {}: {} element(s) skipped", snapshot.frame, report.failed_elements);
            self.metrics
                .add(&self.metrics.render_errors, u64::from(report.failed_elements));
        }

        let slow_frame = self.pacer.paint_done(finished);
        if let Some(slow) = slow_frame {
            self.metrics.inc(&self.metrics.slow_frames);
            self.events.publish(HudEvent::SlowFrame(slow));
        }
        self.metrics.inc(&self.metrics.total_frames);

        FrameOutcome {
            alert,
            values,
            report,
            slow_frame,
        }
    }

    /// Mode button under a touch; the alert banner never takes input.
    pub fn control_at(&self, point: Point2) -> Option<HudControl> {
        self.renderer.layout().control_at(point)
    }

    pub fn drain_events(&mut self) -> Vec<HudEvent> {
        self.events.drain()
    }

    pub fn metrics(&self) -> &HudMetrics {
        &self.metrics
    }

    /// Back to the initial alert state and an unarmed pacer (going offroad).
    pub fn reset(&mut self) {
        self.alerts.reset();
        self.pacer.reset();
    }
}
