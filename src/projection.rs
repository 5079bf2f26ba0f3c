// src/projection.rs
//
// Camera intrinsics and the car-space transform that lines overlay
// geometry up with the displayed video:
//   1) put (0, 0) in the middle of the surface (shifted down by Y_OFFSET)
//   2) apply the same zoom as the video
//   3) move the principal point to the origin
//
// Device frame: x forward, y right, z down (meters).

use crate::config::CameraConfig;
use crate::types::{LeadRecord, Point2};

const ZOOM: f32 = 2912.8;
const Y_OFFSET: f32 = 150.0;

/// Height of the road camera above ground, meters.
pub const CAMERA_HEIGHT: f32 = 1.22;

/// Projected points further than this outside the surface are rejected.
const OFFSCREEN_MARGIN: f32 = 500.0;
/// Leads nearer than this (m) are anchored as if they were this far.
const MIN_LEAD_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub focal_length: f32,
    pub principal_point: Point2,
}

impl From<&CameraConfig> for CameraIntrinsics {
    fn from(cfg: &CameraConfig) -> Self {
        Self {
            focal_length: cfg.focal_length,
            principal_point: Point2::new(cfg.principal_point[0], cfg.principal_point[1]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarSpaceTransform {
    intrinsics: CameraIntrinsics,
    zoom: f32,
    surface_w: f32,
    surface_h: f32,
}

impl CarSpaceTransform {
    pub fn new(intrinsics: CameraIntrinsics, wide: bool, surface_w: u32, surface_h: u32) -> Self {
        let mut zoom = ZOOM / intrinsics.focal_length;
        if wide {
            zoom *= 0.5;
        }
        Self {
            intrinsics,
            zoom,
            surface_w: surface_w as f32,
            surface_h: surface_h as f32,
        }
    }

    pub fn from_config(cfg: &CameraConfig, surface_w: u32, surface_h: u32) -> Self {
        Self::new(CameraIntrinsics::from(cfg), cfg.wide, surface_w, surface_h)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Camera-image pixel → surface pixel.
    pub fn map(&self, p: Point2) -> Point2 {
        let pp = self.intrinsics.principal_point;
        Point2::new(
            (p.x - pp.x) * self.zoom + self.surface_w / 2.0,
            (p.y - pp.y) * self.zoom + self.surface_h / 2.0 + Y_OFFSET,
        )
    }

    /// Map a polygon, dropping it entirely if any vertex is non-finite.
    pub fn map_polygon(&self, poly: &[Point2]) -> Option<Vec<Point2>> {
        if poly.iter().any(|p| !p.is_finite()) {
            return None;
        }
        Some(poly.iter().map(|p| self.map(*p)).collect())
    }

    /// Device-frame point → surface pixel. `None` when the point is
    /// behind the camera or far off screen.
    pub fn project(&self, x: f32, y: f32, z: f32) -> Option<Point2> {
        let out = self.project_unbounded(x, y, z)?;
        let inside = out.x >= -OFFSCREEN_MARGIN
            && out.x <= self.surface_w + OFFSCREEN_MARGIN
            && out.y >= -OFFSCREEN_MARGIN
            && out.y <= self.surface_h + OFFSCREEN_MARGIN;
        inside.then_some(out)
    }

    fn project_unbounded(&self, x: f32, y: f32, z: f32) -> Option<Point2> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) || x <= 0.0 {
            return None;
        }
        let f = self.intrinsics.focal_length;
        let pp = self.intrinsics.principal_point;
        // view frame = (right, down, forward) = (y, z, x)
        let image = Point2::new(f * y / x + pp.x, f * z / x + pp.y);
        Some(self.map(image))
    }

    /// Where a lead's marker is anchored: the road surface under the lead,
    /// pinned to the surface edge when it projects outside (very close leads).
    pub fn lead_anchor(&self, lead: &LeadRecord) -> Option<Point2> {
        if !lead.d_rel.is_finite() {
            return None;
        }
        let d = lead.d_rel.max(MIN_LEAD_DISTANCE);
        let p = self.project_unbounded(d, -lead.y_rel, CAMERA_HEIGHT)?;
        Some(Point2::new(
            p.x.clamp(0.0, self.surface_w),
            p.y.clamp(0.0, self.surface_h),
        ))
    }

    /// Surface rectangle covered by a `width x height` video frame.
    pub fn frame_rect(&self, width: u32, height: u32) -> (Point2, Point2) {
        (
            self.map(Point2::new(0.0, 0.0)),
            self.map(Point2::new(width as f32, height as f32)),
        )
    }
}
