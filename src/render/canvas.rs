// src/render/canvas.rs
//
// Drawing surface abstraction plus the software rasterizer every build
// carries. The renderer only talks to `Canvas`; the OpenCV backend lives
// in `render::mat` behind the `opencv` feature.
//
// Raster rules (kept deterministic so identical input paints identical
// bytes):
//   - coverage is sampled once, at pixel centers; no anti-aliasing
//   - polygons fill even-odd
//   - blending is integer source-over on straight RGBA8

use std::convert::Infallible;

use anyhow::{bail, Result};
use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use sha2::{Digest, Sha256};

use crate::color::Rgba;
use crate::types::Point2;

// ============================================================================
// PRIMITIVE TYPES
// ============================================================================

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `(cx, cy)`.
    pub const fn centered(cx: i32, cy: i32, size: i32) -> Self {
        Self::new(cx - size / 2, cy - size / 2, size, size)
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub const fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub const fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.w as i64 * self.h as i64
        }
    }

    /// Overlap of two rectangles; empty when they do not touch.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        Rect::new(x, y, (r - x).max(0), (b - y).max(0))
    }

    /// Shrink by `d` on every side.
    pub const fn inset(&self, d: i32) -> Rect {
        Rect::new(self.x + d, self.y + d, self.w - 2 * d, self.h - 2 * d)
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.x as f32 && p.x < self.right() as f32 && p.y >= self.y as f32 && p.y < self.bottom() as f32
    }
}

/// Linear gradient along y. Outside `[y0, y1]` the end colors extend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalGradient {
    pub y0: f32,
    pub from: Rgba,
    pub y1: f32,
    pub to: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Vertical(VerticalGradient),
}

impl Paint {
    pub fn vertical(y0: f32, from: Rgba, y1: f32, to: Rgba) -> Self {
        Self::Vertical(VerticalGradient { y0, from, y1, to })
    }

    pub fn color_at(&self, y: f32) -> Rgba {
        match self {
            Self::Solid(c) => *c,
            Self::Vertical(g) => {
                let span = g.y1 - g.y0;
                if span.abs() < f32::EPSILON {
                    return g.to;
                }
                g.from.lerp(g.to, (y - g.y0) / span)
            }
        }
    }

    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Solid(c) => c.a == 0,
            Self::Vertical(g) => g.from.a == 0 && g.to.a == 0,
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Self::Solid(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
}

/// Text appearance. `size_px` is the nominal line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub color: Rgba,
    pub align: TextAlign,
    /// Rotated 90 degrees counter-clockwise, reading bottom to top
    pub vertical: bool,
}

impl TextStyle {
    pub fn new(size_px: f32, color: Rgba) -> Self {
        Self {
            size_px,
            color,
            align: TextAlign::Center,
            vertical: false,
        }
    }

    pub fn left(mut self) -> Self {
        self.align = TextAlign::Left;
        self
    }

    pub fn rotated(mut self) -> Self {
        self.vertical = true;
        self
    }
}

/// Integer glyph scale for a nominal text size. The 10x20 font cell is
/// the unit.
pub fn glyph_scale(size_px: f32) -> i32 {
    if !size_px.is_finite() {
        return 1;
    }
    let base = FONT_10X20.character_size.height as f32;
    ((size_px / base).round() as i32).max(1)
}

/// Rendered width of `text` in pixels at `size_px`.
pub fn text_width(text: &str, size_px: f32) -> i32 {
    let advance = (FONT_10X20.character_size.width + FONT_10X20.character_spacing) as i32;
    text.chars().count() as i32 * advance * glyph_scale(size_px)
}

/// Greedy word wrap to `max_width` pixels. Words longer than a line are
/// kept whole on their own line.
pub fn wrap_text(text: &str, size_px: f32, max_width: i32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if text_width(&candidate, size_px) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Camera image handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel: 3 (RGB) or 4 (RGBA)
    pub channels: u8,
    pub data: Vec<u8>,
}

impl VideoFrame {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("video frame has zero size {}x{}", self.width, self.height);
        }
        if self.channels != 3 && self.channels != 4 {
            bail!("unsupported video frame channel count {}", self.channels);
        }
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.data.len() != expected {
            bail!(
                "video frame buffer is {} bytes, expected {} for {}x{}x{}",
                self.data.len(),
                expected,
                self.width,
                self.height,
                self.channels
            );
        }
        Ok(())
    }

    /// RGB at integer coordinates (alpha is ignored; the camera is opaque).
    pub(crate) fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let i = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }
}

// ============================================================================
// CANVAS TRAIT
// ============================================================================

/// A surface the overlay paints onto. Coordinates are surface pixels with
/// the origin at the top left.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Overwrite every pixel with `color`, no blending.
    fn clear(&mut self, color: Rgba) -> Result<()>;
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()>;
    fn fill_polygon(&mut self, points: &[Point2], paint: &Paint) -> Result<()>;
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) -> Result<()>;
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Rgba) -> Result<()>;
    fn fill_ellipse(&mut self, rect: Rect, color: Rgba) -> Result<()>;
    fn stroke_ellipse(&mut self, rect: Rect, width: f32, color: Rgba) -> Result<()>;
    /// `anchor` is the baseline point: its x is the left edge or the
    /// center depending on `style.align`.
    fn draw_text(&mut self, text: &str, anchor: Point2, style: &TextStyle) -> Result<()>;
    /// Scale `frame` into `dest` (nearest neighbour, opaque copy), writing
    /// only pixels inside `clip`.
    fn blit(&mut self, frame: &VideoFrame, dest: Rect, clip: Rect) -> Result<()>;

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }
}

// ============================================================================
// RASTER CANVAS
// ============================================================================

/// Software RGBA8 canvas.
#[derive(Clone)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterCanvas {
    /// New canvas cleared to opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        };
        canvas.fill_all(Rgba::new(0, 0, 0, 255));
        canvas
    }

    fn fill_all(&mut self, color: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x as i32, y as i32);
        Some(Rgba::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]))
    }

    /// Hex SHA-256 of the pixel buffer.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.data);
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Source-over blend of one pixel.
    fn blend(&mut self, x: i32, y: i32, c: Rgba) {
        if c.a == 0 || !self.in_bounds(x, y) {
            return;
        }
        let i = self.index(x, y);
        if c.a == 255 {
            self.data[i..i + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
            return;
        }
        let sa = c.a as u32;
        let inv = 255 - sa;
        let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
        self.data[i] = mix(c.r, self.data[i]);
        self.data[i + 1] = mix(c.g, self.data[i + 1]);
        self.data[i + 2] = mix(c.b, self.data[i + 2]);
        self.data[i + 3] = (sa + (self.data[i + 3] as u32 * inv + 127) / 255) as u8;
    }

    fn blend_span(&mut self, y: i32, x0: i32, x1: i32, c: Rgba) {
        if y < 0 || y as u32 >= self.height {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i32);
        for x in x0..x1 {
            self.blend(x, y, c);
        }
    }

    /// Visit every pixel of `rect` (clipped) whose center passes `inside`.
    fn fill_where<F>(&mut self, rect: Rect, color: Rgba, inside: F)
    where
        F: Fn(f32, f32) -> bool,
    {
        if color.a == 0 {
            return;
        }
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width as i32);
        let y1 = rect.bottom().min(self.height as i32);
        for y in y0..y1 {
            let cy = y as f32 + 0.5;
            for x in x0..x1 {
                if inside(x as f32 + 0.5, cy) {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

/// Pixel center inside a rounded rectangle given as float edges.
fn in_rounded_rect(px: f32, py: f32, l: f32, t: f32, r: f32, b: f32, radius: f32) -> bool {
    if px < l || px >= r || py < t || py >= b {
        return false;
    }
    let radius = radius.min((r - l) / 2.0).min((b - t) / 2.0).max(0.0);
    let cx = px.clamp(l + radius, r - radius);
    let cy = py.clamp(t + radius, b - radius);
    let (dx, dy) = (px - cx, py - cy);
    dx * dx + dy * dy <= radius * radius
}

fn in_ellipse(px: f32, py: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (px - cx) / rx;
    let dy = (py - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Rgba) -> Result<()> {
        self.fill_all(color);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()> {
        if rect.is_empty() || paint.is_invisible() {
            return Ok(());
        }
        for y in rect.y..rect.bottom() {
            let c = paint.color_at(y as f32 + 0.5);
            self.blend_span(y, rect.x, rect.right(), c);
        }
        Ok(())
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

        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let y_start = (min_y.floor() as i32).max(0);
        let y_end = (max_y.ceil() as i32).min(self.height as i32);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y_start..y_end {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = &points[(i + 1) % points.len()];
                // half-open on y so shared vertices count once
                if (a.y <= sy && sy < b.y) || (b.y <= sy && sy < a.y) {
                    crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            let color = paint.color_at(sy);
            for pair in crossings.chunks_exact(2) {
                // pixels whose centers fall in [x0, x1)
                let x0 = (pair[0] - 0.5).ceil() as i32;
                let x1 = (pair[1] - 0.5).ceil() as i32;
                self.blend_span(y, x0, x1, color);
            }
        }
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let (l, t, r, b) = (rect.x as f32, rect.y as f32, rect.right() as f32, rect.bottom() as f32);
        self.fill_where(rect, color, |px, py| in_rounded_rect(px, py, l, t, r, b, radius));
        Ok(())
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Rgba) -> Result<()> {
        if rect.is_empty() || width <= 0.0 {
            return Ok(());
        }
        let hw = width / 2.0;
        let (l, t, r, b) = (rect.x as f32, rect.y as f32, rect.right() as f32, rect.bottom() as f32);
        let pad = hw.ceil() as i32;
        let outer = Rect::new(rect.x - pad, rect.y - pad, rect.w + 2 * pad, rect.h + 2 * pad);
        self.fill_where(outer, color, |px, py| {
            in_rounded_rect(px, py, l - hw, t - hw, r + hw, b + hw, radius + hw)
                && !in_rounded_rect(px, py, l + hw, t + hw, r - hw, b - hw, (radius - hw).max(0.0))
        });
        Ok(())
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Rgba) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let (cx, cy) = (rect.x as f32 + rect.w as f32 / 2.0, rect.y as f32 + rect.h as f32 / 2.0);
        let (rx, ry) = (rect.w as f32 / 2.0, rect.h as f32 / 2.0);
        self.fill_where(rect, color, |px, py| in_ellipse(px, py, cx, cy, rx, ry));
        Ok(())
    }

    fn stroke_ellipse(&mut self, rect: Rect, width: f32, color: Rgba) -> Result<()> {
        if rect.is_empty() || width <= 0.0 {
            return Ok(());
        }
        let hw = width / 2.0;
        let (cx, cy) = (rect.x as f32 + rect.w as f32 / 2.0, rect.y as f32 + rect.h as f32 / 2.0);
        let (rx, ry) = (rect.w as f32 / 2.0, rect.h as f32 / 2.0);
        let pad = hw.ceil() as i32;
        let outer = Rect::new(rect.x - pad, rect.y - pad, rect.w + 2 * pad, rect.h + 2 * pad);
        self.fill_where(outer, color, |px, py| {
            in_ellipse(px, py, cx, cy, rx + hw, ry + hw) && !in_ellipse(px, py, cx, cy, rx - hw, ry - hw)
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, anchor: Point2, style: &TextStyle) -> Result<()> {
        if text.is_empty() || style.color.a == 0 {
            return Ok(());
        }
        if !anchor.is_finite() {
            bail!("text anchor is not finite");
        }
        let mut target = GlyphTarget {
            canvas: self,
            origin: (anchor.x.round() as i32, anchor.y.round() as i32),
            scale: glyph_scale(style.size_px),
            color: style.color,
            vertical: style.vertical,
        };
        let character_style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let alignment = match style.align {
            TextAlign::Left => Alignment::Left,
            TextAlign::Center => Alignment::Center,
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Alphabetic)
            .build();
        // infallible target
        let _ = Text::with_text_style(text, Point::zero(), character_style, text_style).draw(&mut target);
        Ok(())
    }

    fn blit(&mut self, frame: &VideoFrame, dest: Rect, clip: Rect) -> Result<()> {
        frame.validate()?;
        if dest.is_empty() {
            return Ok(());
        }
        let area = dest.intersect(&clip).intersect(&self.bounds());
        let (x0, x1) = (area.x, area.right());
        for y in area.y..area.bottom() {
            let sy = ((y - dest.y) as i64 * frame.height as i64 / dest.h as i64) as u32;
            for x in x0..x1 {
                let sx = ((x - dest.x) as i64 * frame.width as i64 / dest.w as i64) as u32;
                let (r, g, b) = frame.rgb_at(sx.min(frame.width - 1), sy.min(frame.height - 1));
                let i = self.index(x, y);
                self.data[i..i + 4].copy_from_slice(&[r, g, b, 255]);
            }
        }
        Ok(())
    }
}

/// Adapter that lets embedded-graphics rasterize glyphs into the canvas,
/// scaling each font pixel to a `scale x scale` block.
struct GlyphTarget<'a> {
    canvas: &'a mut RasterCanvas,
    origin: (i32, i32),
    scale: i32,
    color: Rgba,
    vertical: bool,
}

impl Dimensions for GlyphTarget<'_> {
    fn bounding_box(&self) -> Rectangle {
        // glyph space is unbounded; clipping happens per pixel
        Rectangle::new(Point::new(-8192, -8192), Size::new(16384, 16384))
    }
}

impl DrawTarget for GlyphTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let k = self.scale;
        for Pixel(p, c) in pixels {
            if !c.is_on() {
                continue;
            }
            // quarter turn counter-clockwise: glyph x runs up the screen
            let (gx, gy) = if self.vertical { (p.y, -p.x) } else { (p.x, p.y) };
            let bx = self.origin.0 + gx * k;
            let by = self.origin.1 + gy * k;
            for dy in 0..k {
                for dx in 0..k {
                    self.canvas.blend(bx + dx, by + dy, self.color);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_color(canvas: &RasterCanvas, color: Rgba) -> usize {
        canvas
            .data()
            .chunks_exact(4)
            .filter(|px| px == &[color.r, color.g, color.b, color.a])
            .count()
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut canvas = RasterCanvas::new(10, 10);
        let red = Rgba::new(255, 0, 0, 255);
        canvas.fill_rect(Rect::new(-5, -5, 8, 8), &red.into()).unwrap();
        assert_eq!(count_color(&canvas, red), 9);
    }

    #[test]
    fn test_polygon_fill_samples_pixel_centers() {
        let mut canvas = RasterCanvas::new(10, 10);
        let white = Rgba::new(255, 255, 255, 255);
        let square = [
            Point2::new(2.0, 2.0),
            Point2::new(6.0, 2.0),
            Point2::new(6.0, 6.0),
            Point2::new(2.0, 6.0),
        ];
        canvas.fill_polygon(&square, &white.into()).unwrap();
        assert_eq!(count_color(&canvas, white), 16);
        assert_eq!(canvas.pixel(2, 2), Some(white));
        assert_eq!(canvas.pixel(6, 6), Some(Rgba::new(0, 0, 0, 255)));
    }

    #[test]
    fn test_polygon_rejects_bad_geometry() {
        let mut canvas = RasterCanvas::new(4, 4);
        let paint = Paint::Solid(Rgba::new(1, 2, 3, 255));
        assert!(canvas
            .fill_polygon(&[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)], &paint)
            .is_err());
        let nan = [
            Point2::new(0.0, 0.0),
            Point2::new(f32::NAN, 1.0),
            Point2::new(2.0, 2.0),
        ];
        assert!(canvas.fill_polygon(&nan, &paint).is_err());
    }

    #[test]
    fn test_source_over_blend() {
        let mut canvas = RasterCanvas::new(1, 1);
        canvas.clear(Rgba::new(0, 0, 0, 255)).unwrap();
        canvas
            .fill_rect(Rect::new(0, 0, 1, 1), &Rgba::new(255, 255, 255, 128).into())
            .unwrap();
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::new(128, 128, 128, 255)));
    }

    #[test]
    fn test_vertical_gradient_endpoints() {
        let paint = Paint::vertical(0.0, Rgba::new(0, 0, 0, 0), 100.0, Rgba::new(0, 0, 0, 200));
        assert_eq!(paint.color_at(-10.0).a, 0);
        assert_eq!(paint.color_at(50.0).a, 100);
        assert_eq!(paint.color_at(150.0).a, 200);
    }

    #[test]
    fn test_text_draws_scaled_glyphs() {
        let mut canvas = RasterCanvas::new(200, 100);
        let white = Rgba::new(255, 255, 255, 255);
        canvas
            .draw_text("88", Point2::new(100.0, 60.0), &TextStyle::new(40.0, white))
            .unwrap();
        let lit = count_color(&canvas, white);
        assert!(lit > 0);
        // every lit font pixel becomes a 2x2 block
        assert_eq!(lit % 4, 0);
    }

    #[test]
    fn test_text_metrics() {
        assert_eq!(glyph_scale(20.0), 1);
        assert_eq!(glyph_scale(176.0), 9);
        assert_eq!(glyph_scale(5.0), 1);
        assert_eq!(text_width("km/h", 66.0), 4 * 10 * 3);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("TAKE CONTROL IMMEDIATELY", 20.0, 130);
        assert_eq!(lines, vec!["TAKE CONTROL", "IMMEDIATELY"]);
        assert!(wrap_text("   ", 20.0, 100).is_empty());
    }

    #[test]
    fn test_ellipse_and_rounded_rect_stay_inside_bounds() {
        let mut canvas = RasterCanvas::new(20, 20);
        let c = Rgba::new(10, 200, 10, 255);
        canvas.fill_ellipse(Rect::new(0, 0, 20, 20), c).unwrap();
        assert_eq!(canvas.pixel(10, 10), Some(c));
        assert_ne!(canvas.pixel(0, 0), Some(c));

        let mut canvas = RasterCanvas::new(20, 20);
        canvas.fill_rounded_rect(Rect::new(0, 0, 20, 20), 6.0, c).unwrap();
        assert_ne!(canvas.pixel(0, 0), Some(c));
        assert_eq!(canvas.pixel(0, 10), Some(c));
    }

    #[test]
    fn test_blit_scales_nearest() {
        let frame = VideoFrame {
            width: 2,
            height: 1,
            channels: 3,
            data: vec![255, 0, 0, 0, 0, 255],
        };
        let mut canvas = RasterCanvas::new(4, 2);
        canvas.blit(&frame, Rect::new(0, 0, 4, 2), canvas.bounds()).unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(canvas.pixel(2, 0), Some(Rgba::new(0, 0, 255, 255)));

        // clipped columns keep their old content
        let mut clipped = RasterCanvas::new(4, 2);
        clipped.blit(&frame, Rect::new(0, 0, 4, 2), Rect::new(0, 0, 1, 2)).unwrap();
        assert_eq!(clipped.pixel(0, 0), Some(Rgba::new(255, 0, 0, 255)));
        assert_eq!(clipped.pixel(1, 0), Some(Rgba::new(0, 0, 0, 255)));

        let short = VideoFrame {
            data: vec![0; 5],
            ..frame
        };
        assert!(canvas.blit(&short, Rect::new(0, 0, 4, 2), Rect::new(0, 0, 4, 2)).is_err());
    }

    #[test]
    fn test_digest_tracks_content() {
        let a = RasterCanvas::new(8, 8);
        let mut b = RasterCanvas::new(8, 8);
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        b.fill_rect(Rect::new(0, 0, 1, 1), &Rgba::new(9, 9, 9, 255).into()).unwrap();
        assert_ne!(a.digest(), b.digest());
    }
}
