// src/hud/panels.rs
//
// Values for the diagnostic side panels, the tire-pressure panel and the
// standstill timer. Everything here is formatted text plus a severity the
// renderer maps to a pen color.

use crate::types::{SceneSnapshot, TirePressures, TpmsUnit};

// ============================================================================
// THRESHOLDS
// ============================================================================
const LEAD_DIST_CRITICAL: f32 = 5.0;
const LEAD_DIST_CAUTION: i32 = 15;
const LEAD_DIST_FINE_BELOW: f32 = 10.0;

const REL_SPEED_CRITICAL: i32 = -5;

const STEER_ANGLE_CRITICAL: i32 = 50;
const STEER_ANGLE_CAUTION: i32 = 30;

const CPU_TEMP_CRITICAL: f32 = 85.0;
const CPU_TEMP_CAUTION: f32 = 75.0;
const BAT_TEMP_CRITICAL: f32 = 50.0;
const BAT_TEMP_CAUTION: f32 = 40.0;
const AMBIENT_TEMP_CRITICAL: f32 = 50.0;
const AMBIENT_TEMP_CAUTION: f32 = 45.0;

const GPS_CRITICAL: f32 = 1.3;
const GPS_CAUTION: f32 = 0.85;
const GPS_IMPLAUSIBLE: f32 = 99.0;
const GPS_COARSE: f32 = 9.99;

// Tire pressures, psi
const TIRE_LOW: f32 = 32.0;
const TIRE_HIGH: f32 = 45.0;
const TIRE_IMPLAUSIBLE: f32 = 50.0;
const TIRE_IMBALANCE: f32 = 3.0;
const PSI_PER_BAR: f32 = 14.5038;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Good,
    Caution,
    Critical,
}

/// One stat block: big value, caption under it, rotated side note.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub value: String,
    pub caption: &'static str,
    pub side: String,
    pub severity: Severity,
}

impl PanelRow {
    fn new(value: String, caption: &'static str, side: impl Into<String>, severity: Severity) -> Self {
        Self {
            value,
            caption,
            side: side.into(),
            severity,
        }
    }
}

pub fn lead_distance_severity(d_rel: f32) -> Severity {
    if d_rel < LEAD_DIST_CRITICAL {
        Severity::Critical
    } else if (d_rel as i32) < LEAD_DIST_CAUTION {
        Severity::Caution
    } else {
        Severity::Normal
    }
}

pub fn format_lead_distance(d_rel: f32) -> String {
    if d_rel < LEAD_DIST_FINE_BELOW {
        format!("{:.1}", d_rel)
    } else {
        format!("{:.0}", d_rel)
    }
}

/// Severity from relative speed in display units, truncated toward zero.
pub fn rel_speed_severity(v_rel: f32) -> Severity {
    let v = v_rel as i32;
    if v < REL_SPEED_CRITICAL {
        Severity::Critical
    } else if v < 0 {
        Severity::Caution
    } else {
        Severity::Normal
    }
}

pub fn steer_angle_severity(angle_deg: f32) -> Severity {
    let a = (angle_deg as i32).abs();
    if a > STEER_ANGLE_CRITICAL {
        Severity::Critical
    } else if a > STEER_ANGLE_CAUTION {
        Severity::Caution
    } else {
        Severity::Good
    }
}

fn threshold_severity(value: f32, critical: f32, caution: f32) -> Severity {
    if value > critical {
        Severity::Critical
    } else if value > caution {
        Severity::Caution
    } else {
        Severity::Normal
    }
}

pub fn cpu_temp_severity(temp: f32) -> Severity {
    threshold_severity(temp, CPU_TEMP_CRITICAL, CPU_TEMP_CAUTION)
}

pub fn battery_temp_severity(temp: f32) -> Severity {
    threshold_severity(temp, BAT_TEMP_CRITICAL, BAT_TEMP_CAUTION)
}

pub fn ambient_temp_severity(temp: f32) -> Severity {
    threshold_severity(temp, AMBIENT_TEMP_CRITICAL, AMBIENT_TEMP_CAUTION)
}

pub fn gps_severity(accuracy: f32) -> Severity {
    threshold_severity(accuracy, GPS_CRITICAL, GPS_CAUTION)
}

pub fn format_gps_accuracy(accuracy: f32) -> String {
    if !accuracy.is_finite() || accuracy > GPS_IMPLAUSIBLE || accuracy == 0.0 {
        "None".to_string()
    } else if accuracy > GPS_COARSE {
        format!("{:.1}", accuracy)
    } else {
        format!("{:.2}", accuracy)
    }
}

/// Left panel: lead distance / relative speed / steering / steer ratio,
/// plus cruise gap with longitudinal control.
pub fn left_panel(snapshot: &SceneSnapshot) -> Vec<PanelRow> {
    let mut rows = Vec::with_capacity(5);
    let lead = snapshot.lead_one();
    let units = snapshot.units;

    rows.push(match lead {
        Some(l) => PanelRow::new(
            format_lead_distance(l.d_rel),
            "REL DIST",
            "m",
            lead_distance_severity(l.d_rel),
        ),
        None => PanelRow::new(String::new(), "REL DIST", "m", Severity::Normal),
    });

    let speed_unit = if units.is_metric() { "km/h" } else { "mi/h" };
    rows.push(match lead {
        Some(l) => {
            let v_rel = l.v_rel * units.speed_factor();
            PanelRow::new(
                format!("{:.0}", v_rel),
                "REL SPED",
                speed_unit,
                rel_speed_severity(v_rel),
            )
        }
        None => PanelRow::new("-".to_string(), "REL SPED", speed_unit, Severity::Normal),
    });

    let angle = snapshot.steering.angle_deg;
    rows.push(PanelRow::new(
        format!("{:.0}", angle),
        "STER ANG",
        "°",
        steer_angle_severity(angle),
    ));

    rows.push(PanelRow::new(
        format!("{:.2}", snapshot.live_params.steer_ratio),
        "SteerRatio",
        "",
        Severity::Normal,
    ));

    let long = &snapshot.longitudinal;
    if long.enabled {
        let dynamic = long.cruise_gap == long.dynamic_gap_mode;
        let value = if !snapshot.controls.enabled {
            "-".to_string()
        } else if dynamic {
            "AUT".to_string()
        } else {
            long.cruise_gap.to_string()
        };
        let side = if dynamic {
            format!("{:.0}", long.dynamic_gap_value)
        } else {
            String::new()
        };
        rows.push(PanelRow::new(value, "CruiseGap", side, Severity::Normal));
    }
    rows
}

/// Right panel: device temperatures, battery and GPS.
pub fn right_panel(snapshot: &SceneSnapshot) -> Vec<PanelRow> {
    let dev = &snapshot.device;
    let mut rows = Vec::with_capacity(5);
    let fan = format!("{:.0}", dev.fan_speed / 1000.0);

    rows.push(PanelRow::new(
        format!("{:.0}°C", dev.cpu_temp),
        "CPU TEMP",
        format!("{:.0}%", dev.cpu_usage),
        cpu_temp_severity(dev.cpu_temp),
    ));

    if dev.battery_less {
        rows.push(PanelRow::new(
            format!("{:.0}°C", dev.ambient_temp),
            "SYS TEMP",
            fan,
            ambient_temp_severity(dev.ambient_temp),
        ));
    } else {
        rows.push(PanelRow::new(
            format!("{:.0}°C", dev.battery_temp),
            "BAT TEMP",
            fan,
            battery_temp_severity(dev.battery_temp),
        ));
        rows.push(PanelRow::new(
            format!("{:.0}%", dev.battery_percent),
            "BAT LVL",
            if dev.charging { "++" } else { "--" },
            Severity::Normal,
        ));
    }

    if dev.gps_accuracy != 0.0 {
        rows.push(PanelRow::new(
            format_gps_accuracy(dev.gps_accuracy),
            "GPS PREC",
            dev.satellites.to_string(),
            gps_severity(dev.gps_accuracy),
        ));
        rows.push(PanelRow::new(
            format!("{:.0}", dev.altitude),
            "ALTITUDE",
            "m",
            Severity::Normal,
        ));
    }
    rows
}

// ============================================================================
// TIRE PRESSURE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TireLevel {
    /// Below the low threshold (caution)
    Low,
    Normal,
    /// High but plausible (warning)
    High,
    /// Implausible or missing reading
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TireReading {
    pub level: TireLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TirePanel {
    /// FL, FR, RL, RR
    pub readings: [TireReading; 4],
    pub out_of_balance: bool,
}

fn to_psi(value: f32, unit: TpmsUnit) -> f32 {
    match unit {
        TpmsUnit::Psi => value,
        TpmsUnit::Bar => value * PSI_PER_BAR,
    }
}

pub fn classify_tire(psi: f32) -> TireLevel {
    if !psi.is_finite() {
        TireLevel::Unavailable
    } else if psi < TIRE_LOW {
        TireLevel::Low
    } else if psi > TIRE_IMPLAUSIBLE {
        TireLevel::Unavailable
    } else if psi > TIRE_HIGH {
        TireLevel::High
    } else {
        TireLevel::Normal
    }
}

/// `max - min` across wheels exceeds the imbalance delta.
pub fn tires_out_of_balance(psi: &[f32]) -> bool {
    let finite = psi.iter().copied().filter(|p| p.is_finite());
    let (min, max) = finite.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });
    max > min && max - min > TIRE_IMBALANCE
}

pub fn tire_panel(pressures: &TirePressures, unit: TpmsUnit) -> TirePanel {
    let raw = pressures.as_array();
    let psi = raw.map(|v| to_psi(v, unit));

    let reading = |i: usize| {
        let level = classify_tire(psi[i]);
        let text = match (level, unit) {
            (TireLevel::Unavailable, _) => "N/A".to_string(),
            (_, TpmsUnit::Psi) => format!("{:.0}", raw[i]),
            (_, TpmsUnit::Bar) => format!("{:.1}", raw[i]),
        };
        TireReading { level, text }
    };

    TirePanel {
        readings: [reading(0), reading(1), reading(2), reading(3)],
        out_of_balance: tires_out_of_balance(&psi),
    }
}

// ============================================================================
// STANDSTILL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StandstillTimer {
    pub minutes: u32,
    pub seconds: u32,
}

impl StandstillTimer {
    pub fn from_elapsed(elapsed_s: f32) -> Self {
        if !elapsed_s.is_finite() || elapsed_s <= 0.0 {
            return Self::default();
        }
        let total = elapsed_s as u32;
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

// ============================================================================
// TUNING READOUT (debug level 2)
// ============================================================================

/// Two text columns of live tuning values plus the lateral controller name.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningReadout {
    pub params: Vec<String>,
    pub map: Vec<String>,
    pub lateral_control: &'static str,
}

pub fn tuning_readout(snapshot: &SceneSnapshot) -> TuningReadout {
    let lp = &snapshot.live_params;
    let md = &snapshot.map_data;
    TuningReadout {
        params: vec![
            format!("SR:{:.2}", lp.steer_ratio),
            format!("AA:{:.2}", lp.angle_offset_average),
            format!("SF:{:.2}", lp.stiffness_factor),
            format!("AD:{:.2}", lp.steer_actuator_delay),
            format!("SC:{:.2}", lp.steer_rate_cost),
            format!("OS:{:.2}", snapshot.steering.output_scale),
            format!("{:.2}|{:.2}", lp.l_prob, lp.r_prob),
        ],
        map: vec![
            format!("SL:{:.0}", md.speed_limit),
            format!("SLA:{:.0}", md.speed_limit_ahead),
            format!("SLAD:{:.0}", md.speed_limit_ahead_distance),
            format!("TSL:{:.0}", md.turn_speed_limit),
            format!("TSLED:{:.0}", md.turn_speed_limit_end_distance),
            format!("TSLS:{:.0}", md.turn_speed_limit_sign),
        ],
        lateral_control: lp.lateral_control.as_str(),
    }
}
