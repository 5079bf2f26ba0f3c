// src/render/alert_banner.rs
//
// Alert banner: a bottom-anchored band tinted with the status background,
// darkened toward the bottom, with one or two centered text lines. Sized
// by the alert (Small / Mid / Full); a NONE alert paints nothing.

use anyhow::Result;

use crate::color::{colors, Rgba};
use crate::render::canvas::{glyph_scale, wrap_text, Canvas, Paint, Rect, TextStyle};
use crate::render::layout::HudLayout;
use crate::types::{Alert, AlertSize, Point2};

// Text sizes, px
const SMALL_TEXT_PX: f32 = 74.0;
const MID_TITLE_PX: f32 = 88.0;
const MID_SUBTITLE_PX: f32 = 66.0;
const FULL_TITLE_PX: f32 = 177.0;
const FULL_TITLE_LONG_PX: f32 = 132.0;
const FULL_SUBTITLE_PX: f32 = 88.0;
/// Full-size titles longer than this use the smaller font.
const FULL_TITLE_LONG_CHARS: usize = 15;

/// Darkening gradient alpha at the top and bottom of the band.
const SHADE_TOP: f32 = 0.05;
const SHADE_BOTTOM: f32 = 0.35;

/// Fraction of the text size above the baseline.
const ASCENT: f32 = 0.75;

/// One positioned line of banner text.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerLine {
    pub text: String,
    /// Baseline center
    pub anchor: Point2,
    pub size_px: f32,
}

fn line_height(size_px: f32) -> f32 {
    (glyph_scale(size_px) * 20) as f32
}

/// Lines wrapped to `width`, stacked downward from `top`.
fn block(text: &str, size_px: f32, center_x: f32, top: f32, width: i32, wrap: bool) -> Vec<BannerLine> {
    if text.is_empty() {
        return Vec::new();
    }
    let lines = if wrap {
        wrap_text(text, size_px, width)
    } else {
        vec![text.to_string()]
    };
    let pitch = line_height(size_px);
    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| BannerLine {
            text,
            anchor: Point2::new(center_x, top + ASCENT * pitch + i as f32 * pitch),
            size_px,
        })
        .collect()
}

/// Text layout for `alert` inside `banner`.
pub fn banner_lines(alert: &Alert, banner: Rect) -> Vec<BannerLine> {
    let cx = banner.center_x() as f32;
    let cy = banner.center_y() as f32;
    let w = banner.w;
    match alert.size {
        AlertSize::None => Vec::new(),
        AlertSize::Small => {
            // vertically centered single line
            let pitch = line_height(SMALL_TEXT_PX);
            block(&alert.text1, SMALL_TEXT_PX, cx, cy - pitch / 2.0, w, false)
        }
        AlertSize::Mid => {
            let mut lines = block(&alert.text1, MID_TITLE_PX, cx, cy - 125.0, w, false);
            lines.extend(block(&alert.text2, MID_SUBTITLE_PX, cx, cy + 21.0, w, false));
            lines
        }
        AlertSize::Full => {
            let long = alert.text1.chars().count() > FULL_TITLE_LONG_CHARS;
            let (title_px, title_top, subtitle_top) = if long {
                (FULL_TITLE_LONG_PX, 240.0, 361.0)
            } else {
                (FULL_TITLE_PX, 270.0, 420.0)
            };
            let mut lines = block(&alert.text1, title_px, cx, banner.y as f32 + title_top, w, true);
            lines.extend(block(
                &alert.text2,
                FULL_SUBTITLE_PX,
                cx,
                (banner.h as f32 - subtitle_top).max(banner.y as f32),
                w,
                true,
            ));
            lines
        }
    }
}

/// Paint the banner. Returns the painted area in pixels (0 for no alert).
pub fn render_alert_banner(
    canvas: &mut dyn Canvas,
    layout: &HudLayout,
    alert: &Alert,
    background: Rgba,
) -> Result<i64> {
    let Some(banner) = layout.alert_banner(alert.size) else {
        return Ok(0);
    };

    // shade first, tint over it: the tint sits in front of the gradient
    let shade = Paint::vertical(
        banner.y as f32,
        colors::black((SHADE_TOP * 255.0).round() as u8),
        banner.bottom() as f32,
        colors::black((SHADE_BOTTOM * 255.0).round() as u8),
    );
    canvas.fill_rect(banner, &shade)?;
    canvas.fill_rect(banner, &Paint::Solid(background))?;

    for line in banner_lines(alert, banner) {
        canvas.draw_text(&line.text, line.anchor, &TextStyle::new(line.size_px, colors::white(255)))?;
    }
    Ok(banner.area())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::CONTROLS_UNRESPONSIVE;
    use crate::render::canvas::RasterCanvas;

    fn layout() -> HudLayout {
        HudLayout::new(2160, 1080)
    }

    #[test]
    fn test_none_alert_paints_nothing() {
        let mut canvas = RasterCanvas::new(2160, 1080);
        let before = canvas.digest();
        let area = render_alert_banner(&mut canvas, &layout(), &Alert::default(), colors::BG_ALERT).unwrap();
        assert_eq!(area, 0);
        assert_eq!(canvas.digest(), before);
    }

    #[test]
    fn test_banner_area_by_size() {
        let mut canvas = RasterCanvas::new(2160, 1080);
        let small = Alert::new("Hi", "", "t", AlertSize::Small);
        assert_eq!(
            render_alert_banner(&mut canvas, &layout(), &small, colors::BG_ENGAGED).unwrap(),
            2160 * 271
        );
        let full = Alert::new("TAKE CONTROL", "now", CONTROLS_UNRESPONSIVE, AlertSize::Full);
        assert_eq!(
            render_alert_banner(&mut canvas, &layout(), &full, colors::BG_ALERT).unwrap(),
            2160 * 1080
        );
    }

    #[test]
    fn test_banner_leaves_area_above_untouched() {
        let mut canvas = RasterCanvas::new(200, 400);
        let l = HudLayout::new(200, 400);
        let small = Alert::new("", "", "t", AlertSize::Small);
        render_alert_banner(&mut canvas, &l, &small, colors::BG_ENGAGED).unwrap();
        assert_eq!(canvas.pixel(10, 400 - 272), Some(Rgba::new(0, 0, 0, 255)));
        assert_ne!(canvas.pixel(10, 400 - 271), Some(Rgba::new(0, 0, 0, 255)));
    }

    #[test]
    fn test_full_title_shrinks_when_long() {
        let banner = layout().alert_banner(AlertSize::Full).unwrap();
        let short = banner_lines(&Alert::new("BRAKE!", "", "t", AlertSize::Full), banner);
        assert_eq!(short[0].size_px, FULL_TITLE_PX);
        let long = banner_lines(
            &Alert::new("TAKE CONTROL IMMEDIATELY", "Controls Unresponsive", "t", AlertSize::Full),
            banner,
        );
        assert_eq!(long[0].size_px, FULL_TITLE_LONG_PX);
        assert_eq!(long.last().map(|l| l.size_px), Some(FULL_SUBTITLE_PX));
    }

    #[test]
    fn test_mid_has_title_and_subtitle() {
        let banner = layout().alert_banner(AlertSize::Mid).unwrap();
        let lines = banner_lines(&Alert::new("Title", "Sub", "t", AlertSize::Mid), banner);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].anchor.y < lines[1].anchor.y);
        assert!(lines.iter().all(|l| banner.contains(l.anchor)));
    }
}
