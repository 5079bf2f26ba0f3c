// src/hud/speed.rs
//
// Speed readout and speed-limit checks. All speeds here are in the active
// display unit (km/h or mph) unless noted.

use crate::types::{OffsetPolicy, SceneSnapshot, SpeedLimit, SET_SPEED_NA};

/// Limits at or below this are treated as unknown (0 / unset camera data).
pub const SPEED_LIMIT_VALID_MIN: f32 = 19.0;
/// Margin above limit + offset before the over-limit flag trips.
const OVER_LIMIT_MARGIN: f32 = 1.0;
/// The max-speed line is only shown for set speeds at or above this.
const MIN_SHOWN_SET_SPEED: f32 = 20.0;

pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedReadout {
    pub speed: String,
    pub unit: &'static str,
    /// Cruise max speed, `PLACEHOLDER` when unset
    pub max_speed: String,
    /// Speed currently held by cruise, `PLACEHOLDER` when unset
    pub cruise_speed: String,
    pub is_cruise_set: bool,
    /// Top line of the cruise box shows `max_speed` (else a dimmed dash)
    pub show_max_speed: bool,
}

/// Round to the nearest integer (ties to even) and format.
pub fn format_speed(v: f32) -> String {
    if !v.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{}", v.round_ties_even() as i64)
}

pub fn is_cruise_set(v_cruise: f32) -> bool {
    v_cruise.is_finite() && v_cruise > 0.0 && v_cruise as i32 != SET_SPEED_NA as i32
}

pub fn speed_readout(snapshot: &SceneSnapshot) -> SpeedReadout {
    let cruise = &snapshot.cruise;
    let cruise_set = is_cruise_set(cruise.v_cruise);

    SpeedReadout {
        speed: format_speed(snapshot.display_speed()),
        unit: snapshot.units.speed_label(),
        max_speed: if cruise_set {
            format_speed(cruise.v_cruise)
        } else {
            PLACEHOLDER.to_string()
        },
        cruise_speed: if cruise_set {
            format_speed(cruise.set_speed)
        } else {
            PLACEHOLDER.to_string()
        },
        is_cruise_set: cruise_set,
        show_max_speed: cruise_set
            && cruise.set_speed >= MIN_SHOWN_SET_SPEED
            && snapshot.controls.enabled,
    }
}

pub fn is_speed_limit_valid(limit: &SpeedLimit) -> bool {
    limit.value.is_finite() && limit.value > SPEED_LIMIT_VALID_MIN
}

/// Offset added on top of the posted limit.
///
/// Percent mode rounds half away from zero.
pub fn limit_offset(limit: &SpeedLimit) -> f32 {
    match limit.policy {
        OffsetPolicy::Fixed => limit.offset,
        OffsetPolicy::Percent => (limit.value * 0.01 * limit.offset).round(),
    }
}

/// True when `speed` exceeds limit + offset by more than the margin.
pub fn is_over_speed_limit(limit: &SpeedLimit, speed: f32) -> bool {
    if !is_speed_limit_valid(limit) || !speed.is_finite() {
        return false;
    }
    limit.value + limit_offset(limit) + OVER_LIMIT_MARGIN < speed
}
