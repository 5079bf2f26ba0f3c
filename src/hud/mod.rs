// src/hud/mod.rs
//
// Snapshot -> HudValues. Everything is recomputed every tick except the
// engageability and driver-monitoring flags, which refresh at 2 Hz.

pub mod lead;
pub mod panels;
pub mod speed;
pub mod style;

use crate::alert::status_color;
use crate::color::{colors, Rgba};
use crate::types::{Alert, AlertSize, SceneSnapshot};

pub use lead::{LeadMarker, LeadSource};
pub use panels::{PanelRow, Severity, StandstillTimer, TirePanel, TuningReadout};
pub use speed::SpeedReadout;
pub use style::PathStyle;

/// Typed view of everything the overlay draws for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudValues {
    pub speed: SpeedReadout,
    pub over_speed_limit: bool,
    pub speed_limit_valid: bool,
    /// Fill of the max-speed box
    pub max_speed_fill: Rgba,
    /// Max-speed box is hidden while an alert banner is on screen
    pub hide_max_speed_box: bool,
    pub status_color: Rgba,

    /// Nearest first
    pub leads: Vec<LeadMarker>,
    pub lane_line_colors: Vec<Rgba>,
    pub road_edge_colors: Vec<Rgba>,
    pub path: PathStyle,

    pub standstill: Option<StandstillTimer>,

    // Throttled
    pub engageable: bool,
    pub dm_active: bool,

    // Diagnostics, empty in stock mode
    pub left_panel: Vec<PanelRow>,
    pub right_panel: Vec<PanelRow>,
    pub tires: Option<TirePanel>,
    pub tuning: Option<TuningReadout>,
}

pub fn max_speed_fill(snapshot: &SceneSnapshot, over_limit: bool, limit_valid: bool) -> Rgba {
    if over_limit {
        colors::BOX_OVER_LIMIT
    } else if limit_valid {
        colors::BOX_LIMIT_OK
    } else if snapshot.cruise.acc_active {
        colors::BOX_ACC
    } else if snapshot.controls.enabled {
        colors::BOX_ENABLED
    } else {
        colors::BOX_IDLE
    }
}

/// Derives `HudValues`, holding the 2 Hz fields between refreshes.
pub struct HudDeriver {
    throttle_frames: u64,
    frame: u64,
    engageable: bool,
    dm_active: bool,
}

impl HudDeriver {
    pub fn new(throttle_frames: u64) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            frame: 0,
            engageable: false,
            dm_active: false,
        }
    }

    /// `on_screen` is the alert the alert state machine is showing this
    /// frame, not the raw snapshot field.
    pub fn derive(&mut self, snapshot: &SceneSnapshot, on_screen: &Alert) -> HudValues {
        if self.frame % self.throttle_frames == 0 {
            self.engageable = snapshot.controls.engageable || snapshot.controls.enabled;
            self.dm_active = snapshot.driver_monitoring.active;
        }
        self.frame = self.frame.wrapping_add(1);

        let readout = speed::speed_readout(snapshot);
        let limit_valid = speed::is_speed_limit_valid(&snapshot.speed_limit);
        let over_limit = speed::is_over_speed_limit(&snapshot.speed_limit, snapshot.display_speed());
        let stock = snapshot.stock_ui();
        let debug_level = snapshot.display.settings.debug_level;

        let lane_line_colors = snapshot
            .lane_lines
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let prob = snapshot.lane_line_probs.get(i).copied().unwrap_or(0.0);
                style::lane_line_color(prob, stock)
            })
            .collect();
        let road_edge_colors = snapshot
            .road_edges
            .iter()
            .enumerate()
            .map(|(i, _)| style::road_edge_color(snapshot.road_edge_stds.get(i).copied().unwrap_or(1.0)))
            .collect();

        HudValues {
            speed: readout,
            over_speed_limit: over_limit,
            speed_limit_valid: limit_valid,
            max_speed_fill: max_speed_fill(snapshot, over_limit, limit_valid),
            hide_max_speed_box: on_screen.size != AlertSize::None,
            status_color: status_color(snapshot.status),
            leads: lead::lead_markers(snapshot),
            lane_line_colors,
            road_edge_colors,
            path: style::path_style(snapshot),
            standstill: snapshot
                .standstill
                .active
                .then(|| StandstillTimer::from_elapsed(snapshot.standstill.elapsed_s)),
            engageable: self.engageable,
            dm_active: self.dm_active,
            left_panel: if stock { Vec::new() } else { panels::left_panel(snapshot) },
            right_panel: if stock { Vec::new() } else { panels::right_panel(snapshot) },
            tires: (!stock).then(|| {
                panels::tire_panel(
                    &snapshot.device.tire_pressures,
                    snapshot.display.settings.tpms_unit,
                )
            }),
            tuning: (!stock && debug_level >= 2).then(|| panels::tuning_readout(snapshot)),
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OffsetPolicy, SpeedLimit};

    #[test]
    fn test_throttled_fields_hold_between_refreshes() {
        let mut deriver = HudDeriver::new(10);
        let mut snap = SceneSnapshot::default();
        snap.controls.engageable = true;
        snap.driver_monitoring.active = true;

        // frame 0 computes
        let v = deriver.derive(&snap, &Alert::default());
        assert!(v.engageable && v.dm_active);

        snap.controls.engageable = false;
        snap.driver_monitoring.active = false;
        for _ in 1..10 {
            let v = deriver.derive(&snap, &Alert::default());
            assert!(v.engageable, "refreshed before the throttle window");
        }
        // frame 10 refreshes
        let v = deriver.derive(&snap, &Alert::default());
        assert!(!v.engageable && !v.dm_active);
    }

    #[test]
    fn test_enabled_counts_as_engageable() {
        let mut deriver = HudDeriver::new(10);
        let mut snap = SceneSnapshot::default();
        snap.controls.enabled = true;
        assert!(deriver.derive(&snap, &Alert::default()).engageable);
    }

    #[test]
    fn test_max_speed_fill_priority() {
        let mut snap = SceneSnapshot::default();
        assert_eq!(max_speed_fill(&snap, false, false), colors::BOX_IDLE);
        snap.controls.enabled = true;
        assert_eq!(max_speed_fill(&snap, false, false), colors::BOX_ENABLED);
        snap.cruise.acc_active = true;
        assert_eq!(max_speed_fill(&snap, false, false), colors::BOX_ACC);
        assert_eq!(max_speed_fill(&snap, false, true), colors::BOX_LIMIT_OK);
        assert_eq!(max_speed_fill(&snap, true, true), colors::BOX_OVER_LIMIT);
    }

    #[test]
    fn test_over_limit_uses_display_speed() {
        let mut deriver = HudDeriver::new(10);
        let snap = SceneSnapshot {
            // 40 km/h
            v_ego: 40.0 / 3.6,
            speed_limit: SpeedLimit {
                value: 30.0,
                offset: 5.0,
                policy: OffsetPolicy::Fixed,
            },
            ..Default::default()
        };
        let v = deriver.derive(&snap, &Alert::default());
        assert!(v.over_speed_limit);
        assert_eq!(v.max_speed_fill, colors::BOX_OVER_LIMIT);
    }

    #[test]
    fn test_stock_ui_drops_diagnostics() {
        let mut deriver = HudDeriver::new(10);
        let mut snap = SceneSnapshot::default();
        snap.display.settings.debug_level = 2;
        let v = deriver.derive(&snap, &Alert::default());
        assert!(!v.left_panel.is_empty());
        assert!(v.tires.is_some() && v.tuning.is_some());

        snap.display.settings.stock_ui = true;
        let v = deriver.derive(&snap, &Alert::default());
        assert!(v.left_panel.is_empty() && v.right_panel.is_empty());
        assert!(v.tires.is_none() && v.tuning.is_none());
    }

    #[test]
    fn test_on_screen_alert_hides_max_speed_box() {
        let mut deriver = HudDeriver::new(10);
        let shown = Alert::new("A", "", "t", AlertSize::Small);
        let snap = SceneSnapshot::default();
        assert!(deriver.derive(&snap, &shown).hide_max_speed_box);

        // a raw snapshot alert the state machine is not showing does not count
        let raw = SceneSnapshot {
            alert: shown.clone(),
            ..Default::default()
        };
        assert!(!deriver.derive(&raw, &Alert::default()).hide_max_speed_box);
    }

    #[test]
    fn test_missing_lane_probability_reads_as_zero() {
        let mut deriver = HudDeriver::new(10);
        let snap = SceneSnapshot {
            lane_lines: vec![Vec::new(), Vec::new()],
            lane_line_probs: vec![1.0],
            ..Default::default()
        };
        let v = deriver.derive(&snap, &Alert::default());
        assert_eq!(v.lane_line_colors[0], Rgba::new(0, 255, 0, 255));
        assert_eq!(v.lane_line_colors[1], Rgba::new(255, 0, 0, 255));
    }
}
