// src/render/layout.rs
//
// Fixed HUD geometry for a surface size, and pointer hit-testing for the
// mode buttons. Positions are tuned for a 2160x1080 surface; everything is
// anchored to an edge so other sizes still lay out sanely.

use crate::render::canvas::Rect;
use crate::types::{AlertSize, Point2};

/// Border inset around the HUD.
pub const BDR_S: i32 = 30;
/// Header gradient height.
pub const HEADER_H: i32 = 420;
/// Icon disc diameter.
pub const ICON_SIZE: i32 = 180;

const PANEL_WIDTH: i32 = 180;
const PANEL_TOP: i32 = BDR_S + 200;
const PANEL_FIRST_ROW: i32 = BDR_S + 260;
pub const PANEL_ROW_PITCH: i32 = 100;
const PANEL_ROW_HEIGHT: i32 = 104;

const MAX_SPEED_W: i32 = 184;
const MAX_SPEED_H: i32 = 202;

const TPMS_H: i32 = 130;
const TPMS_TOP_INSET: i32 = 260;

const BUTTON_SIZE: i32 = 140;
const BUTTON_PITCH: i32 = 160;
const BUTTON_RIGHT_GAP: i32 = 20;
/// Distance from the surface bottom to the button row's top edge.
const BUTTON_BOTTOM_INSET: i32 = 175;

pub const ALERT_SMALL_H: i32 = 271;
pub const ALERT_MID_H: i32 = 420;

/// Touch targets on the HUD, right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudControl {
    Record,
    LaneMode,
    Navigation,
}

impl HudControl {
    pub const ALL: [HudControl; 3] = [Self::Record, Self::LaneMode, Self::Navigation];

    fn slot(&self) -> i32 {
        match self {
            Self::Record => 0,
            Self::LaneMode => 1,
            Self::Navigation => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudLayout {
    pub width: i32,
    pub height: i32,
}

impl HudLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }

    pub fn surface(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn header(&self) -> Rect {
        Rect::new(0, 0, self.width, HEADER_H)
    }

    pub fn center_x(&self) -> i32 {
        self.width / 2
    }

    pub fn max_speed_box(&self) -> Rect {
        Rect::new(BDR_S, self.height - BDR_S - MAX_SPEED_H, MAX_SPEED_W, MAX_SPEED_H)
    }

    pub fn engage_icon(&self) -> Rect {
        Rect::centered(
            self.width - ICON_SIZE / 2 - BDR_S,
            ICON_SIZE / 2 + BDR_S,
            ICON_SIZE,
        )
    }

    pub fn dm_icon(&self) -> Rect {
        Rect::centered(ICON_SIZE / 2 + BDR_S, ICON_SIZE / 2 + BDR_S, ICON_SIZE)
    }

    pub fn left_panel(&self, rows: usize) -> Rect {
        Rect::new(BDR_S, PANEL_TOP, PANEL_WIDTH, PANEL_ROW_HEIGHT * rows as i32)
    }

    pub fn right_panel(&self, rows: usize) -> Rect {
        Rect::new(
            self.width - BDR_S - PANEL_WIDTH,
            PANEL_TOP,
            PANEL_WIDTH,
            PANEL_ROW_HEIGHT * rows as i32,
        )
    }

    /// Value baseline anchor of row `row` inside a side panel.
    pub fn panel_row_anchor(&self, panel: Rect, row: usize) -> Point2 {
        Point2::new(
            (panel.center_x() - 10) as f32,
            (PANEL_FIRST_ROW + PANEL_ROW_PITCH * row as i32) as f32,
        )
    }

    pub fn tpms_panel(&self) -> Rect {
        Rect::new(
            self.width - BDR_S - PANEL_WIDTH,
            self.height - BDR_S - TPMS_TOP_INSET - 20,
            PANEL_WIDTH,
            TPMS_H,
        )
    }

    pub fn button(&self, control: HudControl) -> Rect {
        Rect::new(
            self.width - BDR_S - BUTTON_SIZE - BUTTON_RIGHT_GAP - BUTTON_PITCH * control.slot(),
            self.height - BUTTON_BOTTOM_INSET,
            BUTTON_SIZE,
            BUTTON_SIZE,
        )
    }

    /// Banner rectangle, anchored to the bottom edge. `None` for no alert.
    pub fn alert_banner(&self, size: AlertSize) -> Option<Rect> {
        let h = match size {
            AlertSize::None => return None,
            AlertSize::Small => ALERT_SMALL_H,
            AlertSize::Mid => ALERT_MID_H,
            AlertSize::Full => self.height,
        };
        let h = h.min(self.height);
        Some(Rect::new(0, self.height - h, self.width, h))
    }

    /// Control under `point`, if any. The alert banner is drawn on top of
    /// the buttons but never takes pointer input, so it is not considered.
    pub fn control_at(&self, point: Point2) -> Option<HudControl> {
        if !point.is_finite() {
            return None;
        }
        HudControl::ALL
            .into_iter()
            .find(|c| self.button(*c).contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> HudLayout {
        HudLayout::new(2160, 1080)
    }

    #[test]
    fn test_button_positions_match_reference_surface() {
        let l = layout();
        assert_eq!(l.button(HudControl::Record), Rect::new(1970, 905, 140, 140));
        assert_eq!(l.button(HudControl::LaneMode).x, 1810);
        assert_eq!(l.button(HudControl::Navigation).x, 1650);
    }

    #[test]
    fn test_control_at() {
        let l = layout();
        assert_eq!(l.control_at(Point2::new(2000.0, 950.0)), Some(HudControl::Record));
        assert_eq!(l.control_at(Point2::new(1700.0, 1000.0)), Some(HudControl::Navigation));
        assert_eq!(l.control_at(Point2::new(1000.0, 500.0)), None);
        assert_eq!(l.control_at(Point2::new(f32::NAN, 950.0)), None);
    }

    #[test]
    fn test_full_alert_does_not_swallow_touches() {
        let l = layout();
        let banner = l.alert_banner(AlertSize::Full).unwrap();
        let p = Point2::new(2000.0, 950.0);
        assert!(banner.contains(p));
        assert_eq!(l.control_at(p), Some(HudControl::Record));
    }

    #[test]
    fn test_alert_banner_heights() {
        let l = layout();
        assert_eq!(l.alert_banner(AlertSize::None), None);
        assert_eq!(l.alert_banner(AlertSize::Small).unwrap(), Rect::new(0, 809, 2160, 271));
        assert_eq!(l.alert_banner(AlertSize::Mid).unwrap().h, 420);
        assert_eq!(l.alert_banner(AlertSize::Full).unwrap(), l.surface());
        // a short surface clamps instead of going negative
        let tiny = HudLayout::new(100, 200);
        assert_eq!(tiny.alert_banner(AlertSize::Mid).unwrap(), Rect::new(0, 0, 100, 200));
    }

    #[test]
    fn test_fixed_boxes() {
        let l = layout();
        assert_eq!(l.max_speed_box(), Rect::new(30, 848, 184, 202));
        assert_eq!(l.engage_icon(), Rect::new(1950, 30, 180, 180));
        assert_eq!(l.dm_icon(), Rect::new(30, 30, 180, 180));
        assert_eq!(l.tpms_panel(), Rect::new(1950, 770, 180, 130));
        assert_eq!(l.left_panel(4), Rect::new(30, 230, 180, 416));
    }
}
