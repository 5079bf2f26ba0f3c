// src/render/mod.rs
//
// Overlay renderer: composes every HUD element onto a canvas in a fixed
// order. Element failures are logged and skipped; nothing escapes render().

pub mod alert_banner;
pub mod canvas;
pub mod hud_panel;
pub mod layout;
#[cfg(feature = "opencv")]
pub mod mat;
pub mod road;

use anyhow::Result;
use tracing::warn;

use crate::alert::AlertUpdate;
use crate::color::colors;
use crate::config::HudConfig;
use crate::hud::HudValues;
use crate::projection::CarSpaceTransform;
use crate::types::SceneSnapshot;

pub use canvas::{Canvas, Paint, RasterCanvas, Rect, TextStyle, VideoFrame};
pub use layout::{HudControl, HudLayout, BDR_S};
#[cfg(feature = "opencv")]
pub use mat::MatCanvas;

/// What one render pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Elements skipped because the canvas returned an error
    pub failed_elements: u32,
    /// Pixels covered by the alert banner
    pub banner_area: i64,
}

pub struct OverlayRenderer {
    transform: CarSpaceTransform,
    layout: HudLayout,
}

impl OverlayRenderer {
    pub fn new(transform: CarSpaceTransform, layout: HudLayout) -> Self {
        Self { transform, layout }
    }

    pub fn from_config(config: &HudConfig) -> Self {
        let (w, h) = (config.surface.width, config.surface.height);
        Self::new(
            CarSpaceTransform::from_config(&config.camera, w, h),
            HudLayout::new(w, h),
        )
    }

    pub fn layout(&self) -> &HudLayout {
        &self.layout
    }

    pub fn transform(&self) -> &CarSpaceTransform {
        &self.transform
    }

    /// Paint one frame. Order is fixed; the alert banner always ends on top.
    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        frame: Option<&VideoFrame>,
        snapshot: &SceneSnapshot,
        values: &HudValues,
        alert: &AlertUpdate,
    ) -> RenderReport {
        let layout = &self.layout;
        let transform = &self.transform;

        let mut failed = 0;
        let mut step = |name: &str, result: Result<()>| {
            if let Err(e) = result {
                warn!("Skipping {} this frame: {:#}", name, e);
                failed += 1;
            }
        };

        step("border", self.paint_border(canvas, alert));
        if let Some(frame) = frame {
            step("video", self.paint_video(canvas, frame));
        }
        step("lanes", road::render_lanes(canvas, snapshot, values, transform));
        step("path", road::render_path(canvas, snapshot, values, transform));
        step("leads", road::render_leads(canvas, values, transform));
        step("header", hud_panel::render_header(canvas, layout));
        step("speed", hud_panel::render_speed(canvas, layout, values));
        step("icons", hud_panel::render_icons(canvas, layout, snapshot, values));
        step("side panels", hud_panel::render_side_panels(canvas, layout, values));
        step("debug text", hud_panel::render_debug_text(canvas, layout, snapshot, values));
        if let Some(tires) = &values.tires {
            step(
                "tpms",
                hud_panel::render_tpms(canvas, layout, tires, snapshot.display.settings.tpms_unit),
            );
        }
        step("buttons", hud_panel::render_buttons(canvas, layout, snapshot));
        step("standstill", hud_panel::render_standstill(canvas, layout, snapshot, values));

        let banner_area =
            match alert_banner::render_alert_banner(canvas, layout, &alert.alert, alert.background) {
                Ok(area) => area,
                Err(e) => {
                    step("alert banner", Err(e));
                    0
                }
            };
        RenderReport {
            failed_elements: failed,
            banner_area,
        }
    }

    /// Whole surface in the status tint; the video covers all but a
    /// BDR_S-wide border.
    fn paint_border(&self, canvas: &mut dyn Canvas, alert: &AlertUpdate) -> Result<()> {
        let surface = canvas.bounds();
        canvas.clear(colors::black(255))?;
        canvas.fill_rect(surface, &Paint::Solid(alert.background))
    }

    fn paint_video(&self, canvas: &mut dyn Canvas, frame: &VideoFrame) -> Result<()> {
        let (tl, br) = self.transform.frame_rect(frame.width, frame.height);
        let dest = Rect::new(
            tl.x.round() as i32,
            tl.y.round() as i32,
            (br.x - tl.x).round() as i32,
            (br.y - tl.y).round() as i32,
        );
        let clip = canvas.bounds().inset(BDR_S);
        canvas.blit(frame, dest, clip)
    }
}
