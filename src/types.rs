// src/types.rs
//
// Scene snapshot: one frame's immutable aggregate of vehicle, perception
// and UI-mode state. Built by the telemetry side, never mutated by the
// render path.

use serde::{Deserialize, Serialize};

/// Raw cruise value meaning "no cruise speed set".
pub const SET_SPEED_NA: f32 = 255.0;

pub const MS_TO_KPH: f32 = 3.6;
pub const MS_TO_MPH: f32 = 2.2369363;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub type Polygon = Vec<Point2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Multiplier from m/s to the display unit.
    pub fn speed_factor(&self) -> f32 {
        match self {
            Self::Metric => MS_TO_KPH,
            Self::Imperial => MS_TO_MPH,
        }
    }

    pub fn speed_label(&self) -> &'static str {
        match self {
            Self::Metric => "km/h",
            Self::Imperial => "mph",
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, Self::Metric)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Disengaged,
    Engaged,
    Warning,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSize {
    #[default]
    None,
    Small,
    Mid,
    Full,
}

/// Control-state alert. Equal iff all four fields match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub text1: String,
    pub text2: String,
    pub alert_type: String,
    pub size: AlertSize,
}

impl Alert {
    pub fn new(text1: &str, text2: &str, alert_type: &str, size: AlertSize) -> Self {
        Self {
            text1: text1.to_string(),
            text2: text2.to_string(),
            alert_type: alert_type.to_string(),
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == AlertSize::None && self.text1.is_empty() && self.text2.is_empty()
    }
}

/// A tracked vehicle ahead.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadRecord {
    /// Relative distance, meters (>= 0)
    pub d_rel: f32,
    /// Relative velocity, m/s (negative = closing)
    pub v_rel: f32,
    /// Lateral offset, meters
    pub y_rel: f32,
    pub valid: bool,
}

impl LeadRecord {
    pub fn is_usable(&self) -> bool {
        self.valid && self.d_rel.is_finite() && self.v_rel.is_finite() && self.d_rel >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetPolicy {
    /// limit + offset
    #[default]
    Fixed,
    /// limit + round(limit * offset / 100)
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLimit {
    /// Posted limit in display units, 0 when unknown
    pub value: f32,
    pub offset: f32,
    pub policy: OffsetPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CruiseState {
    /// Raw max speed, `SET_SPEED_NA` when unset
    pub v_cruise: f32,
    /// Speed the cruise controller is currently holding, display units
    pub set_speed: f32,
    pub acc_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringState {
    pub angle_deg: f32,
    /// Driver is overriding the steering
    pub override_pressed: bool,
    pub output_scale: f32,
    /// Steer max reference used for path torque coloring
    pub steer_max: f32,
}

/// Freshness of the control-state stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsState {
    pub enabled: bool,
    pub engageable: bool,
    /// A control-state message arrived on this tick
    pub updated: bool,
    pub frames_since_start: u64,
    pub seen_since_start: bool,
    pub seconds_since_update: f32,
}

impl Default for ControlsState {
    fn default() -> Self {
        Self {
            enabled: false,
            engageable: false,
            updated: true,
            frames_since_start: 0,
            seen_since_start: true,
            seconds_since_update: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Standstill {
    pub active: bool,
    pub elapsed_s: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneMode {
    Line,
    Less,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TpmsUnit {
    #[default]
    Psi,
    Bar,
}

/// Display settings consumed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// 0 = off, 1 = debug text, 2 = debug text + tuning metrics
    pub debug_level: u8,
    pub stock_ui: bool,
    pub lane_mode: LaneMode,
    pub tpms_unit: TpmsUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToggles {
    pub settings: DisplaySettings,
    pub recording: bool,
    pub map_running: bool,
    pub mapbox_running: bool,
    /// Laneless lateral planning active: lane lines are not drawn
    pub laneless_active: bool,
    /// Diagnostic preview: alerts are shown but never announced
    pub preview_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverMonitoring {
    pub active: bool,
    pub monitoring_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LateralControl {
    #[default]
    Pid,
    Indi,
    Lqr,
}

impl LateralControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pid => "PID",
            Self::Indi => "INDI",
            Self::Lqr => "LQR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveParams {
    pub steer_ratio: f32,
    pub angle_offset_average: f32,
    pub stiffness_factor: f32,
    pub steer_actuator_delay: f32,
    pub steer_rate_cost: f32,
    pub l_prob: f32,
    pub r_prob: f32,
    pub lateral_control: LateralControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapData {
    pub speed_limit: f32,
    pub speed_limit_ahead: f32,
    pub speed_limit_ahead_distance: f32,
    pub turn_speed_limit: f32,
    pub turn_speed_limit_end_distance: f32,
    pub turn_speed_limit_sign: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Longitudinal {
    pub enabled: bool,
    pub cruise_gap: u8,
    /// Gap setting that means "dynamic"
    pub dynamic_gap_mode: u8,
    pub dynamic_gap_value: f32,
}

/// Front-left, front-right, rear-left, rear-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TirePressures {
    pub fl: f32,
    pub fr: f32,
    pub rl: f32,
    pub rr: f32,
}

impl TirePressures {
    pub fn as_array(&self) -> [f32; 4] {
        [self.fl, self.fr, self.rl, self.rr]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceTelemetry {
    pub cpu_temp: f32,
    pub cpu_usage: f32,
    pub battery_temp: f32,
    pub ambient_temp: f32,
    pub battery_percent: f32,
    pub charging: bool,
    /// Device runs without a battery; shows ambient temp instead
    pub battery_less: bool,
    pub fan_speed: f32,
    /// GPS horizontal accuracy in meters, 0 when no fix
    pub gps_accuracy: f32,
    pub satellites: u32,
    pub altitude: f32,
    pub tire_pressures: TirePressures,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    /// Telemetry tick counter
    pub frame: u64,
    /// Vehicle speed, m/s
    pub v_ego: f32,
    pub cruise: CruiseState,
    pub units: UnitSystem,

    // Perception
    /// Nearest-first, at most two
    pub leads: Vec<LeadRecord>,
    /// Radar-measured lead distance, m; `None` when radar has no track
    pub radar_distance: Option<f32>,
    pub lane_line_probs: Vec<f32>,
    pub lane_lines: Vec<Polygon>,
    pub road_edges: Vec<Polygon>,
    pub road_edge_stds: Vec<f32>,
    pub path: Polygon,

    pub steering: SteeringState,
    pub speed_limit: SpeedLimit,
    pub status: Status,
    pub controls: ControlsState,
    pub alert: Alert,
    pub standstill: Standstill,
    pub display: DisplayToggles,
    pub driver_monitoring: DriverMonitoring,

    // Diagnostics
    pub live_params: LiveParams,
    pub map_data: MapData,
    pub longitudinal: Longitudinal,
    pub device: DeviceTelemetry,
    pub debug_text: [String; 2],
}

impl SceneSnapshot {
    pub fn lead_one(&self) -> Option<&LeadRecord> {
        self.leads.first().filter(|l| l.is_usable())
    }

    pub fn lead_two(&self) -> Option<&LeadRecord> {
        self.leads.get(1).filter(|l| l.is_usable())
    }

    pub fn stock_ui(&self) -> bool {
        self.display.settings.stock_ui
    }

    /// Vehicle speed in display units, never negative.
    pub fn display_speed(&self) -> f32 {
        (self.v_ego * self.units.speed_factor()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserializes_with_missing_fields() {
        let snap: SceneSnapshot =
            serde_json::from_str(r#"{"v_ego": 10.0, "units": "imperial"}"#).unwrap();
        assert_eq!(snap.units, UnitSystem::Imperial);
        assert!(snap.leads.is_empty());
        assert_eq!(snap.alert.size, AlertSize::None);
        assert!(snap.controls.updated);
    }

    #[test]
    fn test_lead_accessors_skip_invalid() {
        let snap = SceneSnapshot {
            leads: vec![
                LeadRecord {
                    d_rel: 20.0,
                    valid: false,
                    ..Default::default()
                },
                LeadRecord {
                    d_rel: 30.0,
                    valid: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(snap.lead_one().is_none());
        assert_eq!(snap.lead_two().map(|l| l.d_rel), Some(30.0));
    }

    #[test]
    fn test_lead_with_nan_distance_is_unusable() {
        let lead = LeadRecord {
            d_rel: f32::NAN,
            valid: true,
            ..Default::default()
        };
        assert!(!lead.is_usable());
    }
}
