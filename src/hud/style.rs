// src/hud/style.rs
//
// Colors for road geometry: lane lines by model confidence, road edges by
// their std, and the driving path by applied steering torque.

use crate::color::{colors, Rgba};
use crate::types::{SceneSnapshot, SteeringState};

/// Confidence at which a lane line is drawn pure yellow.
pub const LANE_PROB_PIVOT: f32 = 0.4;
/// Slope of the red/green ramp around the pivot.
const LANE_PROB_GAIN: f32 = 2.5;
/// Steer-max reference point for torque coloring.
const STEER_MAX_REF: f32 = 0.9;
const STEER_MAX_MARGIN: f32 = 1.5;

/// Red at low confidence, green at high confidence, yellow at the pivot.
/// Stock mode draws flat white with alpha = probability.
pub fn lane_line_color(prob: f32, stock_ui: bool) -> Rgba {
    let p = if prob.is_finite() { prob.clamp(0.0, 1.0) } else { 0.0 };
    if stock_ui {
        return Rgba::from_f32(1.0, 1.0, 1.0, p);
    }
    let (red, green) = if p > LANE_PROB_PIVOT {
        ((1.0 - (p - LANE_PROB_PIVOT) * LANE_PROB_GAIN).min(1.0), 1.0)
    } else {
        (1.0, (1.0 - (LANE_PROB_PIVOT - p) * LANE_PROB_GAIN).min(1.0))
    };
    Rgba::from_f32(red.max(0.0), green.max(0.0), 0.0, 1.0)
}

pub fn road_edge_color(std: f32) -> Rgba {
    let alpha = if std.is_finite() { (1.0 - std).clamp(0.0, 1.0) } else { 0.0 };
    Rgba::from_f32(1.0, 0.0, 0.0, alpha)
}

/// Torque level on a 0..=255 scale (can exceed 255 when saturated).
pub fn torque_level(steering: &SteeringState) -> i32 {
    let steer_max_v = steering.steer_max - STEER_MAX_MARGIN * (steering.steer_max - STEER_MAX_REF);
    let level = (255.0 * steering.output_scale * steer_max_v).abs();
    if level.is_finite() {
        level.min(i32::MAX as f32) as i32
    } else {
        0
    }
}

/// Path fill: `bottom` color at the bottom of the surface fading to `top`
/// at one quarter of the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStyle {
    pub bottom: Rgba,
    pub top: Rgba,
}

pub fn path_style(snapshot: &SceneSnapshot) -> PathStyle {
    let steering = &snapshot.steering;
    if snapshot.controls.enabled && !snapshot.stock_ui() {
        if steering.override_pressed {
            return PathStyle {
                bottom: colors::black(80),
                top: colors::black(20),
            };
        }
        let torque = torque_level(steering);
        let red = torque.min(255);
        let green = (255 - torque).clamp(0, 255);
        PathStyle {
            bottom: Rgba::new(red as u8, green as u8, 0, 150),
            top: Rgba::new((0.7 * red as f32) as u8, (0.7 * green as f32) as u8, 0, 20),
        }
    } else {
        PathStyle {
            bottom: colors::white(150),
            top: colors::white(20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_color_gradient() {
        // confident lines go green
        assert_eq!(lane_line_color(0.8, false), Rgba::new(0, 255, 0, 255));
        assert_eq!(lane_line_color(1.0, false), Rgba::new(0, 255, 0, 255));
        // pivot is yellow
        assert_eq!(lane_line_color(0.4, false), Rgba::new(255, 255, 0, 255));
        // weak lines go red
        assert_eq!(lane_line_color(0.0, false), Rgba::new(255, 0, 0, 255));
        let mid = lane_line_color(0.7, false);
        assert_eq!(mid.g, 255);
        assert_eq!(mid.r, 64);
    }

    #[test]
    fn test_lane_color_stock_mode() {
        assert_eq!(lane_line_color(0.5, true), Rgba::new(255, 255, 255, 128));
        assert_eq!(lane_line_color(f32::NAN, true).a, 0);
    }

    #[test]
    fn test_road_edge_alpha() {
        assert_eq!(road_edge_color(0.0).a, 255);
        assert_eq!(road_edge_color(1.5).a, 0);
    }

    #[test]
    fn test_path_disengaged_is_white() {
        let snap = SceneSnapshot::default();
        let style = path_style(&snap);
        assert_eq!(style.bottom, colors::white(150));
        assert_eq!(style.top, colors::white(20));
    }

    #[test]
    fn test_path_override_is_black() {
        let mut snap = SceneSnapshot::default();
        snap.controls.enabled = true;
        snap.steering.override_pressed = true;
        snap.steering.output_scale = 1.0;
        assert_eq!(path_style(&snap).bottom, colors::black(80));
    }

    #[test]
    fn test_path_torque_color() {
        let mut snap = SceneSnapshot::default();
        snap.controls.enabled = true;
        snap.steering.steer_max = 0.9;
        snap.steering.output_scale = 0.0;
        assert_eq!(path_style(&snap).bottom, Rgba::new(0, 255, 0, 150));

        snap.steering.output_scale = 0.5;
        let half = path_style(&snap);
        // 255 * 0.5 * 0.9 = 114.75
        assert_eq!(half.bottom, Rgba::new(114, 141, 0, 150));
        assert_eq!(half.top, Rgba::new(79, 98, 0, 20));

        snap.steering.output_scale = -2.0;
        assert_eq!(path_style(&snap).bottom, Rgba::new(255, 0, 0, 150));
    }

    #[test]
    fn test_stock_ui_path_is_white_even_when_engaged() {
        let mut snap = SceneSnapshot::default();
        snap.controls.enabled = true;
        snap.display.settings.stock_ui = true;
        assert_eq!(path_style(&snap).bottom, colors::white(150));
    }
}
