// src/render/mat.rs
//
// OpenCV backend (feature `opencv`). Each primitive is rasterized into an
// 8-bit coverage mask the size of its on-frame bounding box, then
// composited onto that region of the BGR frame: the paint color is laid
// over the region with `add_weighted` and copied back through the mask.
//
// Vertical gradients take one color per row, sampled at the row center.
// Rotated text is drawn upright: put_text has no rotation.

use anyhow::{bail, Result};
use opencv::{
    core::{self, Mat, Point, Scalar, Size, ToInputArray, Vec3b, Vector},
    imgproc,
    prelude::*,
};

use crate::color::Rgba;
use crate::render::canvas::{Canvas, Paint, Rect, TextAlign, TextStyle, VideoFrame};
use crate::types::Point2;

/// Hershey simplex is roughly this many px tall at scale 1.0.
const HERSHEY_PX: f64 = 30.0;

fn bgr(c: Rgba) -> Scalar {
    Scalar::new(c.b as f64, c.g as f64, c.r as f64, 0.0)
}

fn cv_rect(r: Rect) -> core::Rect {
    core::Rect::new(r.x, r.y, r.w, r.h)
}

/// `r` in the coordinates of a mask whose origin is `area`'s corner.
fn local(r: Rect, area: Rect) -> Rect {
    Rect::new(r.x - area.x, r.y - area.y, r.w, r.h)
}

fn grow(r: Rect, d: i32) -> Rect {
    Rect::new(r.x - d, r.y - d, r.w + 2 * d, r.h + 2 * d)
}

const ON: f64 = 255.0;

/// Coverage mask for `area` of the frame.
struct Stencil {
    area: Rect,
    mask: Mat,
}

impl Stencil {
    fn offset(&self) -> Point {
        Point::new(-self.area.x, -self.area.y)
    }

    fn at(&self, x: i32, y: i32) -> Point {
        Point::new(x - self.area.x, y - self.area.y)
    }
}

pub struct MatCanvas {
    mat: Mat,
}

impl MatCanvas {
    /// Black BGR canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mat = Mat::new_rows_cols_with_default(
            height as i32,
            width as i32,
            core::CV_8UC3,
            Scalar::all(0.0),
        )?;
        Ok(Self { mat })
    }

    /// Wrap an existing 8-bit BGR frame.
    pub fn from_mat(mat: Mat) -> Result<Self> {
        if mat.typ() != core::CV_8UC3 {
            bail!("MatCanvas needs a CV_8UC3 frame, got type {}", mat.typ());
        }
        Ok(Self { mat })
    }

    pub fn mat(&self) -> &Mat {
        &self.mat
    }

    pub fn into_mat(self) -> Mat {
        self.mat
    }

    /// Mask over the on-frame part of `bounds`, filled with `value`.
    /// `None` when nothing of `bounds` is on the frame.
    fn stencil(&self, bounds: Rect, value: f64) -> Result<Option<Stencil>> {
        let area = bounds.intersect(&self.bounds());
        if area.is_empty() {
            return Ok(None);
        }
        let mask = Mat::new_rows_cols_with_default(area.h, area.w, core::CV_8UC1, Scalar::all(value))?;
        Ok(Some(Stencil { area, mask }))
    }

    /// Composite a solid color through `mask` onto `area` of the frame.
    fn composite_solid(&mut self, area: Rect, mask: &impl ToInputArray, color: Rgba) -> Result<()> {
        if color.a == 0 || area.is_empty() {
            return Ok(());
        }
        let alpha = color.a as f64 / 255.0;
        let overlay = Mat::new_rows_cols_with_default(area.h, area.w, core::CV_8UC3, bgr(color))?;
        let mut region = Mat::roi_mut(&mut self.mat, cv_rect(area))?;
        let mut blended = Mat::default();
        core::add_weighted(&overlay, alpha, &region, 1.0 - alpha, 0.0, &mut blended, -1)?;
        blended.copy_to_masked(&mut region, mask)?;
        Ok(())
    }

    fn composite(&mut self, stencil: &Stencil, paint: &Paint) -> Result<()> {
        let area = stencil.area;
        match paint {
            Paint::Solid(c) => self.composite_solid(area, &stencil.mask, *c),
            Paint::Vertical(_) => {
                for row in 0..area.h {
                    let y = area.y + row;
                    let color = paint.color_at(y as f32 + 0.5);
                    if color.a == 0 {
                        continue;
                    }
                    let line = Mat::roi(&stencil.mask, core::Rect::new(0, row, area.w, 1))?;
                    self.composite_solid(Rect::new(area.x, y, area.w, 1), &line, color)?;
                }
                Ok(())
            }
        }
    }

    /// Rounded rect into a stencil; `rect` is in frame coordinates.
    fn rounded_rect_mask(stencil: &mut Stencil, rect: Rect, radius: i32, value: f64) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let r = radius.min(rect.w / 2).min(rect.h / 2).max(0);
        let fill = Scalar::all(value);
        let rect = local(rect, stencil.area);
        let mask = &mut stencil.mask;
        imgproc::rectangle(mask, core::Rect::new(rect.x + r, rect.y, rect.w - 2 * r, rect.h), fill, -1, imgproc::LINE_8, 0)?;
        imgproc::rectangle(mask, core::Rect::new(rect.x, rect.y + r, rect.w, rect.h - 2 * r), fill, -1, imgproc::LINE_8, 0)?;
        if r > 0 {
            for (cx, cy) in [
                (rect.x + r, rect.y + r),
                (rect.right() - r - 1, rect.y + r),
                (rect.x + r, rect.bottom() - r - 1),
                (rect.right() - r - 1, rect.bottom() - r - 1),
            ] {
                imgproc::circle(mask, Point::new(cx, cy), r, fill, -1, imgproc::LINE_8, 0)?;
            }
        }
        Ok(())
    }

    fn ellipse(&mut self, rect: Rect, thickness: i32, color: Rgba) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let Some(mut stencil) = self.stencil(grow(rect, thickness.max(0) / 2 + 1), 0.0)? else {
            return Ok(());
        };
        let center = stencil.at(rect.center_x(), rect.center_y());
        imgproc::ellipse(
            &mut stencil.mask,
            center,
            Size::new(rect.w / 2, rect.h / 2),
            0.0,
            0.0,
            360.0,
            Scalar::all(ON),
            thickness,
            imgproc::LINE_8,
            0,
        )?;
        self.composite_solid(stencil.area, &stencil.mask, color)
    }
}

impl Canvas for MatCanvas {
    fn width(&self) -> u32 {
        self.mat.cols().max(0) as u32
    }

    fn height(&self) -> u32 {
        self.mat.rows().max(0) as u32
    }

    fn clear(&mut self, color: Rgba) -> Result<()> {
        let all = core::Rect::new(0, 0, self.mat.cols(), self.mat.rows());
        imgproc::rectangle(&mut self.mat, all, bgr(color), -1, imgproc::LINE_8, 0)?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()> {
        if rect.is_empty() || paint.is_invisible() {
            return Ok(());
        }
        match self.stencil(rect, ON)? {
            Some(stencil) => self.composite(&stencil, paint),
            None => Ok(()),
        }
    }

    fn fill_polygon(&mut self, points: &[Point2], paint: &Paint) -> Result<()> {
        if points.len() < 3 {
            bail!("polygon needs at least 3 vertices, got {}", points.len());
        }
        if points.iter().any(|p| !p.is_finite()) {
            bail!("polygon has non-finite vertices");
        }
        if paint.is_invisible() {
            return Ok(());
        }
        let pts: Vec<Point> = points
            .iter()
            .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
            .collect();
        let (x0, x1) = pts.iter().fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
        let (y0, y1) = pts.iter().fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let Some(mut stencil) = self.stencil(
            Rect::new(x0, y0, x1.saturating_sub(x0).saturating_add(1), y1.saturating_sub(y0).saturating_add(1)),
            0.0,
        )? else {
            return Ok(());
        };
        let mut pts_vec = Vector::<Vector<Point>>::new();
        pts_vec.push(Vector::from_iter(pts));
        let offset = stencil.offset();
        imgproc::fill_poly(&mut stencil.mask, &pts_vec, Scalar::all(ON), imgproc::LINE_8, 0, offset)?;
        self.composite(&stencil, paint)
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) -> Result<()> {
        let Some(mut stencil) = self.stencil(rect, 0.0)? else {
            return Ok(());
        };
        Self::rounded_rect_mask(&mut stencil, rect, radius.round() as i32, ON)?;
        self.composite_solid(stencil.area, &stencil.mask, color)
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Rgba) -> Result<()> {
        let hw = (width / 2.0).round() as i32;
        let r = radius.round() as i32;
        let outer = Rect::new(rect.x - hw, rect.y - hw, rect.w + 2 * hw, rect.h + 2 * hw);
        let inner = Rect::new(rect.x + hw, rect.y + hw, rect.w - 2 * hw, rect.h - 2 * hw);
        let Some(mut stencil) = self.stencil(outer, 0.0)? else {
            return Ok(());
        };
        Self::rounded_rect_mask(&mut stencil, outer, r + hw, ON)?;
        Self::rounded_rect_mask(&mut stencil, inner, (r - hw).max(0), 0.0)?;
        self.composite_solid(stencil.area, &stencil.mask, color)
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Rgba) -> Result<()> {
        self.ellipse(rect, -1, color)
    }

    fn stroke_ellipse(&mut self, rect: Rect, width: f32, color: Rgba) -> Result<()> {
        self.ellipse(rect, (width.round() as i32).max(1), color)
    }

    fn draw_text(&mut self, text: &str, anchor: Point2, style: &TextStyle) -> Result<()> {
        if text.is_empty() || style.color.a == 0 {
            return Ok(());
        }
        if !anchor.is_finite() {
            bail!("text anchor is not finite");
        }
        let scale = style.size_px as f64 / HERSHEY_PX;
        let thickness = ((style.size_px / 25.0).round() as i32).max(1);
        let mut baseline = 0;
        let size = imgproc::get_text_size(text, imgproc::FONT_HERSHEY_SIMPLEX, scale, thickness, &mut baseline)?;
        let x = match style.align {
            TextAlign::Left => anchor.x.round() as i32,
            TextAlign::Center => anchor.x.round() as i32 - size.width / 2,
        };

        let y = anchor.y.round() as i32;
        let bounds = Rect::new(
            x - thickness,
            y - size.height - thickness,
            size.width + 2 * thickness,
            size.height + baseline + 2 * thickness,
        );
        let Some(mut stencil) = self.stencil(bounds, 0.0)? else {
            return Ok(());
        };
        let origin = stencil.at(x, y);
        imgproc::put_text(
            &mut stencil.mask,
            text,
            origin,
            imgproc::FONT_HERSHEY_SIMPLEX,
            scale,
            Scalar::all(ON),
            thickness,
            imgproc::LINE_8,
            false,
        )?;
        self.composite_solid(stencil.area, &stencil.mask, style.color)
    }

    fn blit(&mut self, frame: &VideoFrame, dest: Rect, clip: Rect) -> Result<()> {
        frame.validate()?;
        if dest.is_empty() {
            return Ok(());
        }
        let area = dest.intersect(&clip).intersect(&self.bounds());
        for y in area.y..area.bottom() {
            let sy = ((y - dest.y) as i64 * frame.height as i64 / dest.h as i64) as u32;
            for x in area.x..area.right() {
                let sx = ((x - dest.x) as i64 * frame.width as i64 / dest.w as i64) as u32;
                let (r, g, b) = frame.rgb_at(sx.min(frame.width - 1), sy.min(frame.height - 1));
                *self.mat.at_2d_mut::<Vec3b>(y, x)? = Vec3b::from([b, g, r]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_blends_bgr() {
        let mut canvas = MatCanvas::new(4, 4).unwrap();
        canvas
            .fill_rect(Rect::new(0, 0, 2, 2), &Paint::Solid(Rgba::new(255, 0, 0, 255)))
            .unwrap();
        let px = *canvas.mat().at_2d::<Vec3b>(0, 0).unwrap();
        assert_eq!(px, Vec3b::from([0, 0, 255]));
        let untouched = *canvas.mat().at_2d::<Vec3b>(3, 3).unwrap();
        assert_eq!(untouched, Vec3b::from([0, 0, 0]));
    }

    #[test]
    fn test_gradient_blends_per_row_inside_rect() {
        let mut canvas = MatCanvas::new(4, 10).unwrap();
        let paint = Paint::vertical(0.0, Rgba::new(255, 0, 0, 0), 10.0, Rgba::new(255, 0, 0, 250));
        canvas.fill_rect(Rect::new(0, 0, 3, 10), &paint).unwrap();
        for y in 0..10 {
            let want = paint.color_at(y as f32 + 0.5).a as i32;
            let px = *canvas.mat().at_2d::<Vec3b>(y, 1).unwrap();
            assert!((px[2] as i32 - want).abs() <= 1, "row {}: {} vs {}", y, px[2], want);
            let outside = *canvas.mat().at_2d::<Vec3b>(y, 3).unwrap();
            assert_eq!(outside, Vec3b::from([0, 0, 0]));
        }
    }

    #[test]
    fn test_polygon_partly_off_frame() {
        let mut canvas = MatCanvas::new(8, 8).unwrap();
        let tri = [Point2::new(-20.0, -20.0), Point2::new(30.0, 4.0), Point2::new(-20.0, 30.0)];
        canvas
            .fill_polygon(&tri, &Paint::Solid(Rgba::new(0, 255, 0, 255)))
            .unwrap();
        assert_eq!(*canvas.mat().at_2d::<Vec3b>(4, 0).unwrap(), Vec3b::from([0, 255, 0]));
        // fully off frame is a no-op
        let gone = [Point2::new(-9.0, -9.0), Point2::new(-2.0, -9.0), Point2::new(-2.0, -2.0)];
        canvas.fill_polygon(&gone, &Paint::Solid(Rgba::new(255, 255, 255, 255))).unwrap();
    }

    #[test]
    fn test_rejects_non_bgr_mat() {
        let gray = Mat::new_rows_cols_with_default(2, 2, core::CV_8UC1, Scalar::all(0.0)).unwrap();
        assert!(MatCanvas::from_mat(gray).is_err());
    }
}
