// src/alert.rs
//
// Alert state machine.
//
// Every frame the incoming control-state alert is compared field-wise with
// the one currently on screen. Equal alerts are a no-op (no banner
// repaint); a new non-empty alert is announced to the notifier unless the
// UI is in preview mode. Empty/NONE is both the initial and the cleared
// state.
//
// When the control-state stream goes quiet the alert is synthesized from
// its freshness instead: "waiting" if it was never seen since start,
// "unresponsive" once it has been silent for CONTROLS_TIMEOUT_S.

use crate::color::{colors, Rgba};
use crate::types::{Alert, AlertSize, SceneSnapshot, Status};
use tracing::{debug, info};

pub const CONTROLS_UNRESPONSIVE: &str = "controlsUnresponsive";
pub const CONTROLS_WAITING: &str = "controlsWaiting";

const CONTROLS_TIMEOUT_S: f32 = 5.0;
/// Seconds after start before a silent control stream raises an alert.
const STARTUP_GRACE_S: u64 = 5;

/// Receives "alert became active" signals (sound/haptics live elsewhere).
pub trait AlertNotifier {
    fn alert_activated(&mut self, alert: &Alert);
}

/// Notifier that drops every signal.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl AlertNotifier for NullNotifier {
    fn alert_activated(&mut self, _alert: &Alert) {}
}

/// Result of one alert update.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertUpdate {
    pub alert: Alert,
    /// Border tint for this frame
    pub background: Rgba,
    /// Alert differs from the previous one
    pub changed: bool,
    /// Banner needs repainting (alert or background changed)
    pub repaint: bool,
}

pub fn status_color(status: Status) -> Rgba {
    match status {
        Status::Disengaged => colors::BG_DISENGAGED,
        Status::Engaged => colors::BG_ENGAGED,
        Status::Warning => colors::BG_WARNING,
        Status::Alert => colors::BG_ALERT,
    }
}

/// Background tint: the status color, except that an unresponsive
/// controller always shows the ALERT color.
pub fn background_for(status: Status, alert: &Alert) -> Rgba {
    if alert.alert_type == CONTROLS_UNRESPONSIVE {
        status_color(Status::Alert)
    } else {
        status_color(status)
    }
}

/// Read the alert carried by this snapshot.
///
/// `None` means the control stream is stale but not yet timed out; the
/// alert on screen should be left as is.
pub fn incoming_alert(snapshot: &SceneSnapshot, ui_freq: u32) -> Option<Alert> {
    let controls = &snapshot.controls;
    if controls.updated {
        return Some(normalize(snapshot.alert.clone()));
    }

    if controls.frames_since_start > STARTUP_GRACE_S * u64::from(ui_freq) {
        if !controls.seen_since_start {
            return Some(Alert::new(
                "openpilot Unavailable",
                "Waiting for controls to start",
                CONTROLS_WAITING,
                AlertSize::Mid,
            ));
        }
        if controls.seconds_since_update > CONTROLS_TIMEOUT_S {
            return Some(Alert::new(
                "TAKE CONTROL IMMEDIATELY",
                "Controls Unresponsive",
                CONTROLS_UNRESPONSIVE,
                AlertSize::Full,
            ));
        }
    }
    None
}

/// A NONE-sized alert carries no text.
fn normalize(alert: Alert) -> Alert {
    if alert.size == AlertSize::None {
        Alert::default()
    } else {
        alert
    }
}

/// `(alert, changed)` for this snapshot given the alert currently shown.
pub fn derive_alert(snapshot: &SceneSnapshot, previous: &Alert, ui_freq: u32) -> (Alert, bool) {
    match incoming_alert(snapshot, ui_freq) {
        Some(alert) => {
            let changed = alert != *previous;
            (alert, changed)
        }
        None => (previous.clone(), false),
    }
}

/// Holds the alert and tint on screen; nothing else survives a frame.
pub struct AlertStateMachine {
    current: Alert,
    background: Rgba,
    ui_freq: u32,
}

impl AlertStateMachine {
    pub fn new(ui_freq: u32) -> Self {
        Self {
            current: Alert::default(),
            background: status_color(Status::Disengaged),
            ui_freq,
        }
    }

    pub fn update(
        &mut self,
        snapshot: &SceneSnapshot,
        notifier: &mut dyn AlertNotifier,
    ) -> AlertUpdate {
        let (alert, changed) = derive_alert(snapshot, &self.current, self.ui_freq);
        let background = background_for(snapshot.status, &alert);
        let repaint = changed || background != self.background;

        if changed {
            if alert.is_empty() {
                debug!("Alert cleared");
            } else if snapshot.display.preview_mode {
                debug!("Alert '{}' shown in preview mode, not announced", alert.alert_type);
            } else {
                info!(
                    "Alert active: {} ({:?}) {} / {}",
                    alert.alert_type, alert.size, alert.text1, alert.text2
                );
                notifier.alert_activated(&alert);
            }
            self.current = alert.clone();
        }
        self.background = background;

        AlertUpdate {
            alert,
            background,
            changed,
            repaint,
        }
    }

    pub fn current(&self) -> &Alert {
        &self.current
    }

    /// Clear back to the initial state (e.g. going offroad).
    pub fn reset(&mut self) {
        self.current = Alert::default();
        self.background = status_color(Status::Disengaged);
    }
}
