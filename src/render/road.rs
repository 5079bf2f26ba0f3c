// src/render/road.rs
//
// Road-space layer: lane lines, road edges, the driving path and the lead
// vehicle chevrons. Geometry arrives in camera-image pixels and goes
// through the car-space transform before it touches the canvas.

use anyhow::Result;
use tracing::{debug, warn};

use crate::color::{colors, Rgba};
use crate::hud::{HudValues, LeadMarker, LeadSource};
use crate::projection::CarSpaceTransform;
use crate::render::canvas::{Canvas, Paint, TextStyle};
use crate::types::{Point2, SceneSnapshot};

/// Lead label size, px.
const LEAD_LABEL_PX: f32 = 35.0;
/// Polygons with less area than this are treated as degenerate.
const MIN_POLYGON_AREA: f32 = 1e-3;

/// Shoelace area, unsigned.
pub fn polygon_area(points: &[Point2]) -> f32 {
    let n = points.len();
    let twice: f32 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    (twice / 2.0).abs()
}

/// At least 3 finite vertices enclosing a non-zero area.
pub fn is_drawable(points: &[Point2]) -> bool {
    points.len() >= 3 && points.iter().all(Point2::is_finite) && polygon_area(points) > MIN_POLYGON_AREA
}

fn fill_mapped(
    canvas: &mut dyn Canvas,
    transform: &CarSpaceTransform,
    polygon: &[Point2],
    paint: &Paint,
    what: &str,
) -> Result<()> {
    let mapped = match transform.map_polygon(polygon) {
        Some(p) if is_drawable(&p) => p,
        _ => {
            if !polygon.is_empty() {
                debug!("Skipping degenerate {} polygon ({} vertices)", what, polygon.len());
            }
            return Ok(());
        }
    };
    canvas.fill_polygon(&mapped, paint)
}

/// Lane lines and road edges. Nothing is drawn while laneless planning
/// is active. A polygon the canvas rejects is skipped, not the whole layer.
pub fn render_lanes(
    canvas: &mut dyn Canvas,
    snapshot: &SceneSnapshot,
    values: &HudValues,
    transform: &CarSpaceTransform,
) -> Result<()> {
    if snapshot.display.laneless_active {
        return Ok(());
    }
    let lines = snapshot
        .lane_lines
        .iter()
        .zip(&values.lane_line_colors)
        .map(|(p, c)| (p, c, "lane line"));
    let edges = snapshot
        .road_edges
        .iter()
        .zip(&values.road_edge_colors)
        .map(|(p, c)| (p, c, "road edge"));
    for (i, (polygon, color, what)) in lines.chain(edges).enumerate() {
        if let Err(e) = fill_mapped(canvas, transform, polygon, &Paint::Solid(*color), what) {
            warn!("Skipping {} #{}: {:#}", what, i, e);
        }
    }
    Ok(())
}

/// Driving path, fading from the bottom edge up to a quarter height.
pub fn render_path(
    canvas: &mut dyn Canvas,
    snapshot: &SceneSnapshot,
    values: &HudValues,
    transform: &CarSpaceTransform,
) -> Result<()> {
    let h = canvas.height() as f32;
    let paint = Paint::vertical(h, values.path.bottom, h / 4.0, values.path.top);
    fill_mapped(canvas, transform, &snapshot.path, &paint, "path")
}

/// Glow triangle and chevron vertices for a marker anchored at `(x, y)`.
pub fn chevron_geometry(x: f32, y: f32, size: f32) -> ([Point2; 3], [Point2; 3]) {
    let g_xo = size / 5.0;
    let g_yo = size / 10.0;
    let glow = [
        Point2::new(x + size * 1.35 + g_xo, y + size + g_yo),
        Point2::new(x, y - g_xo),
        Point2::new(x - size * 1.35 - g_xo, y + size + g_yo),
    ];
    let chevron = [
        Point2::new(x + size * 1.25, y + size),
        Point2::new(x, y),
        Point2::new(x - size * 1.25, y + size),
    ];
    (glow, chevron)
}

fn lead_palette(marker: &LeadMarker) -> (Rgba, Rgba, Rgba) {
    match marker.source {
        LeadSource::Radar => (colors::RADAR_GLOW, colors::red(marker.alpha), colors::white(255)),
        LeadSource::Vision => (colors::VISION_GLOW, colors::green(marker.alpha), colors::black(255)),
    }
}

pub fn render_lead(
    canvas: &mut dyn Canvas,
    marker: &LeadMarker,
    transform: &CarSpaceTransform,
) -> Result<()> {
    let Some(anchor) = transform.lead_anchor(&marker.lead) else {
        debug!("Lead at {:.1} m projects off screen", marker.lead.d_rel);
        return Ok(());
    };
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let sz = marker.size;
    let x = anchor.x.clamp(0.0, (w - sz / 2.0).max(0.0));
    let y = anchor.y.min(h - sz * 0.6);

    let (glow, chevron) = chevron_geometry(x, y, sz);
    let (glow_color, fill, label_color) = lead_palette(marker);
    canvas.fill_polygon(&glow, &Paint::Solid(glow_color))?;
    canvas.fill_polygon(&chevron, &Paint::Solid(fill))?;

    // label centered in the chevron's box
    let label_y = y + sz * 1.25 / 2.0 + LEAD_LABEL_PX / 2.0;
    canvas.draw_text(
        marker.source.label(),
        Point2::new(x, label_y),
        &TextStyle::new(LEAD_LABEL_PX, label_color),
    )
}

/// Leads farthest first, so the nearest vehicle ends up on top.
pub fn render_leads(
    canvas: &mut dyn Canvas,
    values: &HudValues,
    transform: &CarSpaceTransform,
) -> Result<()> {
    for marker in values.leads.iter().rev() {
        if let Err(e) = render_lead(canvas, marker, transform) {
            warn!("Skipping lead at {:.1} m: {:#}", marker.lead.d_rel, e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::hud::HudDeriver;
    use crate::render::canvas::{RasterCanvas, Rect, VideoFrame};
    use crate::types::{Alert, LeadRecord};

    /// Raster canvas whose first polygon fill fails.
    struct FlakyCanvas {
        inner: RasterCanvas,
        polygon_calls: usize,
    }

    impl FlakyCanvas {
        fn new() -> Self {
            Self {
                inner: RasterCanvas::new(2160, 1080),
                polygon_calls: 0,
            }
        }
    }

    impl Canvas for FlakyCanvas {
        fn width(&self) -> u32 {
            self.inner.width()
        }
        fn height(&self) -> u32 {
            self.inner.height()
        }
        fn clear(&mut self, color: Rgba) -> Result<()> {
            self.inner.clear(color)
        }
        fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()> {
            self.inner.fill_rect(rect, paint)
        }
        fn fill_polygon(&mut self, points: &[Point2], paint: &Paint) -> Result<()> {
            self.polygon_calls += 1;
            if self.polygon_calls == 1 {
                anyhow::bail!("backend refused polygon");
            }
            self.inner.fill_polygon(points, paint)
        }
        fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) -> Result<()> {
            self.inner.fill_rounded_rect(rect, radius, color)
        }
        fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Rgba) -> Result<()> {
            self.inner.stroke_rounded_rect(rect, radius, width, color)
        }
        fn fill_ellipse(&mut self, rect: Rect, color: Rgba) -> Result<()> {
            self.inner.fill_ellipse(rect, color)
        }
        fn stroke_ellipse(&mut self, rect: Rect, width: f32, color: Rgba) -> Result<()> {
            self.inner.stroke_ellipse(rect, width, color)
        }
        fn draw_text(&mut self, text: &str, anchor: Point2, style: &TextStyle) -> Result<()> {
            self.inner.draw_text(text, anchor, style)
        }
        fn blit(&mut self, frame: &VideoFrame, dest: Rect, clip: Rect) -> Result<()> {
            self.inner.blit(frame, dest, clip)
        }
    }

    fn quad(bottom_x: f32, top_x: f32) -> Vec<Point2> {
        vec![
            Point2::new(bottom_x - 12.0, 1100.0),
            Point2::new(bottom_x + 12.0, 1100.0),
            Point2::new(top_x + 3.0, 700.0),
            Point2::new(top_x - 3.0, 700.0),
        ]
    }

    fn transform() -> CarSpaceTransform {
        CarSpaceTransform::from_config(&CameraConfig::default(), 2160, 1080)
    }

    #[test]
    fn test_rejected_lane_line_does_not_drop_the_rest() {
        let snap = SceneSnapshot {
            lane_lines: vec![quad(700.0, 930.0), quad(1230.0, 1000.0)],
            lane_line_probs: vec![0.9, 0.9],
            road_edges: vec![quad(500.0, 900.0)],
            road_edge_stds: vec![0.2],
            ..Default::default()
        };
        let values = HudDeriver::new(1).derive(&snap, &Alert::default());
        let mut canvas = FlakyCanvas::new();
        render_lanes(&mut canvas, &snap, &values, &transform()).unwrap();
        assert_eq!(canvas.polygon_calls, 3);
        assert_ne!(canvas.inner.digest(), RasterCanvas::new(2160, 1080).digest());
    }

    #[test]
    fn test_rejected_lead_does_not_drop_the_other() {
        let lead = |d_rel| LeadRecord {
            d_rel,
            v_rel: 0.0,
            y_rel: 0.0,
            valid: true,
        };
        let snap = SceneSnapshot {
            leads: vec![lead(10.0), lead(30.0)],
            ..Default::default()
        };
        let values = HudDeriver::new(1).derive(&snap, &Alert::default());
        assert_eq!(values.leads.len(), 2);
        let mut canvas = FlakyCanvas::new();
        render_leads(&mut canvas, &values, &transform()).unwrap();
        // far lead fails on its glow; near lead still paints glow + chevron
        assert_eq!(canvas.polygon_calls, 3);
    }

    #[test]
    fn test_degenerate_polygons() {
        let line = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)];
        assert!(!is_drawable(&line));
        let two = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
        assert!(!is_drawable(&two));
        let tri = [Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(0.0, 4.0)];
        assert!(is_drawable(&tri));
        assert!((polygon_area(&tri) - 8.0).abs() < 1e-6);
        let nan = [Point2::new(0.0, 0.0), Point2::new(f32::NAN, 0.0), Point2::new(0.0, 4.0)];
        assert!(!is_drawable(&nan));
    }

    #[test]
    fn test_chevron_geometry() {
        let (glow, chevron) = chevron_geometry(100.0, 50.0, 10.0);
        assert_eq!(chevron[1], Point2::new(100.0, 50.0));
        assert_eq!(chevron[0], Point2::new(112.5, 60.0));
        assert_eq!(glow[1], Point2::new(100.0, 48.0));
        assert!((glow[2].x - 84.5).abs() < 1e-3);
        assert!((glow[2].y - 61.0).abs() < 1e-3);
        // the glow encloses the chevron
        assert!(polygon_area(&glow) > polygon_area(&chevron));
    }
}
