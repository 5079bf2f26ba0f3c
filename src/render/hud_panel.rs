// src/render/hud_panel.rs
//
// Screen-space HUD chrome: header shade, speed readout and max-speed box,
// engage / driver-monitoring icons, diagnostic side panels, TPMS, mode
// buttons and the standstill banner.

use anyhow::Result;

use crate::color::{colors, Rgba};
use crate::hud::panels::{TireLevel, TirePanel};
use crate::hud::{HudValues, PanelRow, Severity};
use crate::render::canvas::{glyph_scale, Canvas, Paint, Rect, TextStyle};
use crate::render::layout::{HudControl, HudLayout, BDR_S, HEADER_H};
use crate::types::{LaneMode, Point2, SceneSnapshot, TpmsUnit};

/// Alpha values for HUD text and glyphs.
pub mod alpha {
    pub const TEXT: u8 = 255;
    pub const TEXT_DIM: u8 = 200;
    pub const TEXT_FAINT: u8 = 100;
    pub const DEBUG: u8 = 150;
    pub const STANDSTILL: u8 = 240;
    pub const BUTTON_FILL: u8 = 150;

    pub const HEADER_SHADE: f32 = 0.45;
    pub const DEBUG_OPACITY: f32 = 0.7;
    pub const GLYPH_DISENGAGEABLE: f32 = 0.5;
    pub const GLYPH_DM_IDLE: f32 = 0.2;
}

const SPEED_PX: f32 = 176.0;
const SPEED_BASELINE: f32 = 210.0;
const UNIT_PX: f32 = 66.0;
const UNIT_BASELINE: f32 = 290.0;

const BOX_RADIUS: f32 = 20.0;
const BOX_PEN: f32 = 10.0;
const MAX_SPEED_PX: f32 = 70.0;
const CRUISE_SPEED_PX: f32 = 90.0;

const PANEL_RADIUS: f32 = 20.0;
const PANEL_PEN: f32 = 6.0;
const PANEL_VALUE_PX: f32 = 58.0;
const PANEL_CAPTION_PX: f32 = 27.0;

const TPMS_TITLE_PX: f32 = 33.0;

const BUTTON_PEN: f32 = 6.0;
const BUTTON_LABEL_PX: f32 = 39.0;

const ICON_RING_PEN: f32 = 10.0;

/// Baseline that vertically centers a line of `size_px` text on `cy`.
fn centered_baseline(cy: f32, size_px: f32) -> f32 {
    // glyph cell is 20 high with the baseline at 15
    cy + 5.0 * glyph_scale(size_px) as f32
}

pub fn severity_color(severity: Severity) -> Rgba {
    match severity {
        Severity::Normal => colors::white(alpha::TEXT_DIM),
        Severity::Good => colors::green(alpha::TEXT_DIM),
        Severity::Caution => colors::orange(alpha::TEXT_DIM),
        Severity::Critical => colors::red(alpha::TEXT_DIM),
    }
}

pub fn tire_color(level: TireLevel) -> Rgba {
    match level {
        TireLevel::Low => colors::yellow(alpha::TEXT_DIM),
        TireLevel::Normal => colors::green(alpha::TEXT_DIM),
        TireLevel::High => colors::red(alpha::TEXT_DIM),
        TireLevel::Unavailable => colors::white(alpha::TEXT_DIM),
    }
}

// ============================================================================
// HEADER + SPEED
// ============================================================================

pub fn render_header(canvas: &mut dyn Canvas, layout: &HudLayout) -> Result<()> {
    let h = HEADER_H as f32;
    let shade = Paint::vertical(
        h - h / 2.5,
        colors::black((alpha::HEADER_SHADE * 255.0).round() as u8),
        h,
        colors::black(0),
    );
    canvas.fill_rect(layout.header(), &shade)
}

pub fn render_speed(canvas: &mut dyn Canvas, layout: &HudLayout, values: &HudValues) -> Result<()> {
    let speed = &values.speed;

    if !values.hide_max_speed_box {
        let rc = layout.max_speed_box();
        canvas.fill_rounded_rect(rc, BOX_RADIUS, values.max_speed_fill)?;
        canvas.stroke_rounded_rect(rc, BOX_RADIUS, BOX_PEN, colors::white(100))?;

        let cx = rc.center_x() as f32;
        let bottom = layout.height - BDR_S;
        let (max_text, max_alpha) = if speed.show_max_speed {
            (speed.max_speed.as_str(), alpha::TEXT)
        } else if speed.is_cruise_set {
            ("-", alpha::TEXT_DIM)
        } else {
            ("-", alpha::TEXT_FAINT)
        };
        canvas.draw_text(
            max_text,
            Point2::new(cx, (bottom - 127) as f32),
            &TextStyle::new(MAX_SPEED_PX, colors::white(max_alpha)),
        )?;

        let (cruise_text, cruise_alpha) = if speed.is_cruise_set {
            (speed.cruise_speed.as_str(), alpha::TEXT)
        } else {
            ("-", alpha::TEXT_FAINT)
        };
        canvas.draw_text(
            cruise_text,
            Point2::new(cx, (bottom - 32) as f32),
            &TextStyle::new(CRUISE_SPEED_PX, colors::white(cruise_alpha)),
        )?;
    }

    let cx = layout.center_x() as f32;
    canvas.draw_text(
        &speed.speed,
        Point2::new(cx, SPEED_BASELINE),
        &TextStyle::new(SPEED_PX, colors::white(alpha::TEXT)),
    )?;
    canvas.draw_text(
        speed.unit,
        Point2::new(cx, UNIT_BASELINE),
        &TextStyle::new(UNIT_PX, colors::white(alpha::TEXT_DIM)),
    )
}

// ============================================================================
// ICONS
// ============================================================================

/// Thin bar from the center outward at `angle_deg` (screen degrees,
/// clockwise from the +x axis).
fn spoke(cx: f32, cy: f32, inner: f32, outer: f32, half_w: f32, angle_deg: f32) -> [Point2; 4] {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let at = |along: f32, across: f32| Point2::new(cx + along * c - across * s, cy + along * s + across * c);
    [
        at(inner, -half_w),
        at(outer, -half_w),
        at(outer, half_w),
        at(inner, half_w),
    ]
}

/// Steering-wheel glyph rotated by `-angle_deg`.
fn draw_wheel_glyph(canvas: &mut dyn Canvas, icon: Rect, angle_deg: f32, color: Rgba) -> Result<()> {
    let ring = Rect::centered(icon.center_x(), icon.center_y(), icon.w * 5 / 9);
    canvas.stroke_ellipse(ring, ICON_RING_PEN, color)?;
    let hub = Rect::centered(icon.center_x(), icon.center_y(), icon.w / 9);
    canvas.fill_ellipse(hub, color)?;

    let (cx, cy) = (icon.center_x() as f32, icon.center_y() as f32);
    let outer = ring.w as f32 / 2.0;
    let rotation = if angle_deg.is_finite() { -angle_deg } else { 0.0 };
    // spokes at 3, 9 and 6 o'clock on a level wheel
    for base in [0.0f32, 180.0, 90.0] {
        let bar = spoke(cx, cy, hub.w as f32 / 2.0, outer, 4.0, base + rotation);
        canvas.fill_polygon(&bar, &Paint::Solid(color))?;
    }
    Ok(())
}

fn draw_face_glyph(canvas: &mut dyn Canvas, icon: Rect, color: Rgba) -> Result<()> {
    let (cx, cy) = (icon.center_x(), icon.center_y());
    let head = Rect::new(cx - icon.w / 5, cy - icon.h / 4, icon.w * 2 / 5, icon.h / 2);
    canvas.stroke_ellipse(head, 8.0, color)?;
    for dx in [-icon.w / 12, icon.w / 12] {
        canvas.fill_ellipse(Rect::centered(cx + dx, cy - icon.h / 20, icon.w / 18), color)?;
    }
    Ok(())
}

pub fn render_icons(
    canvas: &mut dyn Canvas,
    layout: &HudLayout,
    snapshot: &SceneSnapshot,
    values: &HudValues,
) -> Result<()> {
    let engage = layout.engage_icon();
    canvas.fill_ellipse(engage, values.status_color)?;
    let opacity = if values.engageable { 1.0 } else { alpha::GLYPH_DISENGAGEABLE };
    draw_wheel_glyph(
        canvas,
        engage,
        snapshot.steering.angle_deg,
        colors::white(255).faded(opacity),
    )?;

    let dm = layout.dm_icon();
    let dm_bg = if snapshot.driver_monitoring.monitoring_mode {
        colors::DM_MODE_BG
    } else {
        colors::DM_IDLE_BG
    };
    canvas.fill_ellipse(dm, dm_bg)?;
    let opacity = if values.dm_active { 1.0 } else { alpha::GLYPH_DM_IDLE };
    draw_face_glyph(canvas, dm, colors::white(255).faded(opacity))
}

// ============================================================================
// DIAGNOSTIC PANELS
// ============================================================================

fn draw_panel_rows(canvas: &mut dyn Canvas, layout: &HudLayout, panel: Rect, rows: &[PanelRow]) -> Result<()> {
    canvas.stroke_rounded_rect(panel, PANEL_RADIUS, PANEL_PEN, colors::PANEL_BORDER)?;
    let caption_color = colors::white(alpha::TEXT_DIM);
    for (i, row) in rows.iter().enumerate() {
        let anchor = layout.panel_row_anchor(panel, i);
        canvas.draw_text(
            &row.value,
            anchor,
            &TextStyle::new(PANEL_VALUE_PX, severity_color(row.severity)),
        )?;
        canvas.draw_text(
            row.caption,
            Point2::new(anchor.x, anchor.y + 35.0),
            &TextStyle::new(PANEL_CAPTION_PX, caption_color),
        )?;
        if !row.side.is_empty() {
            canvas.draw_text(
                &row.side,
                Point2::new(anchor.x + 90.0, anchor.y + 20.0),
                &TextStyle::new(PANEL_CAPTION_PX, caption_color).left().rotated(),
            )?;
        }
    }
    Ok(())
}

pub fn render_side_panels(canvas: &mut dyn Canvas, layout: &HudLayout, values: &HudValues) -> Result<()> {
    if !values.left_panel.is_empty() {
        let panel = layout.left_panel(values.left_panel.len());
        draw_panel_rows(canvas, layout, panel, &values.left_panel)?;
    }
    if !values.right_panel.is_empty() {
        let panel = layout.right_panel(values.right_panel.len());
        draw_panel_rows(canvas, layout, panel, &values.right_panel)?;
    }
    Ok(())
}

/// Debug text lines (level >= 1) and the tuning columns (level 2).
pub fn render_debug_text(
    canvas: &mut dyn Canvas,
    layout: &HudLayout,
    snapshot: &SceneSnapshot,
    values: &HudValues,
) -> Result<()> {
    if snapshot.stock_ui() || snapshot.display.settings.debug_level == 0 {
        return Ok(());
    }
    let mapbox = snapshot.display.mapbox_running;
    let color = colors::white(alpha::DEBUG).faded(alpha::DEBUG_OPACITY);

    let (px, nudge) = if mapbox { (20.0, [15.0, 5.0]) } else { (25.0, [0.0, 0.0]) };
    let bottom = layout.height as f32;
    let rows = [bottom - 50.0, bottom - 20.0];
    for ((text, y), nudge) in snapshot.debug_text.iter().zip(rows).zip(nudge) {
        canvas.draw_text(
            text,
            Point2::new(205.0, y - BDR_S as f32 + nudge),
            &TextStyle::new(px, color).left(),
        )?;
    }

    let Some(tuning) = &values.tuning else {
        return Ok(());
    };
    let px = if mapbox { 26.0 } else { 35.0 };
    let x = (BDR_S + 190) as f32;
    let top = (BDR_S + 100 + 240) as f32;
    let map_x = x + if mapbox { 150.0 } else { 200.0 };
    for (i, line) in tuning.params.iter().enumerate() {
        canvas.draw_text(line, Point2::new(x, top + 40.0 * i as f32), &TextStyle::new(px, color).left())?;
    }
    for (i, line) in tuning.map.iter().enumerate() {
        canvas.draw_text(line, Point2::new(map_x, top + 40.0 * i as f32), &TextStyle::new(px, color).left())?;
    }
    canvas.draw_text(
        tuning.lateral_control,
        Point2::new(layout.center_x() as f32, (BDR_S + 310) as f32),
        &TextStyle::new(px, color),
    )
}

pub fn render_tpms(
    canvas: &mut dyn Canvas,
    layout: &HudLayout,
    tires: &TirePanel,
    unit: TpmsUnit,
) -> Result<()> {
    let panel = layout.tpms_panel();
    if tires.out_of_balance {
        canvas.fill_rounded_rect(panel, PANEL_RADIUS, colors::TPMS_IMBALANCE)?;
    }
    canvas.stroke_rounded_rect(panel, PANEL_RADIUS, PANEL_PEN, colors::PANEL_BORDER)?;

    let cx = panel.center_x() as f32;
    let top = (panel.y + 20) as f32;
    canvas.draw_text(
        "TPMS",
        Point2::new(cx, top + 15.0),
        &TextStyle::new(TPMS_TITLE_PX, colors::white(alpha::TEXT_DIM)),
    )?;

    let (dx, px) = match unit {
        TpmsUnit::Bar => (46.0, 39.0),
        TpmsUnit::Psi => (50.0, 45.0),
    };
    // FL, FR, RL, RR
    let slots = [(-dx, 55.0), (dx, 55.0), (-dx, 95.0), (dx, 95.0)];
    for (reading, (ox, oy)) in tires.readings.iter().zip(slots) {
        canvas.draw_text(
            &reading.text,
            Point2::new(cx + ox, top + oy),
            &TextStyle::new(px, tire_color(reading.level)),
        )?;
    }
    Ok(())
}

// ============================================================================
// BUTTONS + STANDSTILL
// ============================================================================

/// Fill when the control's mode is on, plus its one- or two-line label.
fn button_face(control: HudControl, snapshot: &SceneSnapshot) -> (Option<Rgba>, Vec<&'static str>, f32) {
    let toggles = &snapshot.display;
    match control {
        HudControl::Record => (
            toggles.recording.then(|| colors::red(alpha::BUTTON_FILL)),
            vec!["REC"],
            BUTTON_LABEL_PX,
        ),
        HudControl::LaneMode => {
            let label = match toggles.settings.lane_mode {
                LaneMode::Line => vec!["LANE", "LINE"],
                LaneMode::Less => vec!["LANE", "LESS"],
                LaneMode::Auto => vec!["AUTO"],
            };
            (
                toggles.laneless_active.then(|| colors::green(alpha::BUTTON_FILL)),
                label,
                BUTTON_LABEL_PX,
            )
        }
        HudControl::Navigation => {
            let (label, px) = if toggles.mapbox_running {
                (vec!["MAP", "Search"], 38.0)
            } else {
                (vec!["NAVI"], 45.0)
            };
            (toggles.map_running.then(|| colors::blue(alpha::BUTTON_FILL)), label, px)
        }
    }
}

pub fn render_buttons(canvas: &mut dyn Canvas, layout: &HudLayout, snapshot: &SceneSnapshot) -> Result<()> {
    if snapshot.stock_ui() {
        return Ok(());
    }
    for control in HudControl::ALL {
        let rect = layout.button(control);
        let (fill, label, px) = button_face(control, snapshot);
        if let Some(fill) = fill {
            canvas.fill_ellipse(rect, fill)?;
        }
        canvas.stroke_ellipse(rect, BUTTON_PEN, colors::PANEL_BORDER)?;

        let cx = rect.center_x() as f32;
        let cy = rect.center_y() as f32;
        let style = TextStyle::new(px, colors::white(alpha::TEXT_DIM));
        match label.as_slice() {
            [one] => canvas.draw_text(one, Point2::new(cx, centered_baseline(cy, px)), &style)?,
            [first, second] => {
                canvas.draw_text(first, Point2::new(cx, centered_baseline(cy - 20.0, px)), &style)?;
                canvas.draw_text(second, Point2::new(cx, centered_baseline(cy + 20.0, px)), &style)?;
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn render_standstill(
    canvas: &mut dyn Canvas,
    layout: &HudLayout,
    snapshot: &SceneSnapshot,
    values: &HudValues,
) -> Result<()> {
    let Some(timer) = values.standstill else {
        return Ok(());
    };
    let right = layout.width - BDR_S;
    let (x, timer_y, stop_px, timer_px) = if snapshot.display.mapbox_running {
        (right - 295, BDR_S + 510, 105.0, 125.0)
    } else {
        (right - 545, BDR_S + 560, 150.0, 175.0)
    };
    canvas.draw_text(
        "STOP",
        Point2::new(x as f32, (BDR_S + 410) as f32),
        &TextStyle::new(stop_px, colors::ochre(alpha::STANDSTILL)),
    )?;
    canvas.draw_text(
        &timer.label(),
        Point2::new(x as f32, timer_y as f32),
        &TextStyle::new(timer_px, colors::white(alpha::STANDSTILL)),
    )
}
