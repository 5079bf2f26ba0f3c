// src/color.rs
//
// RGBA color value shared by the deriver and the canvases, plus the HUD
// palette. Channels are straight (non-premultiplied) 0..=255.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from unit-range floats, clamping each channel.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: unit_to_u8(r),
            g: unit_to_u8(g),
            b: unit_to_u8(b),
            a: unit_to_u8(a),
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scale alpha by an opacity factor in [0, 1].
    pub fn faded(self, opacity: f32) -> Self {
        let o = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            a: (self.a as f32 * o).round() as u8,
            ..self
        }
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

fn unit_to_u8(v: f32) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// HUD palette. Helpers take the alpha like the rest of the overlay code.
pub mod colors {
    use super::Rgba;

    pub const fn red(a: u8) -> Rgba {
        Rgba::new(201, 34, 49, a)
    }
    pub const fn black(a: u8) -> Rgba {
        Rgba::new(0, 0, 0, a)
    }
    pub const fn white(a: u8) -> Rgba {
        Rgba::new(255, 255, 255, a)
    }
    pub const fn yellow(a: u8) -> Rgba {
        Rgba::new(218, 202, 37, a)
    }
    pub const fn ochre(a: u8) -> Rgba {
        Rgba::new(218, 111, 37, a)
    }
    pub const fn green(a: u8) -> Rgba {
        Rgba::new(0, 255, 0, a)
    }
    pub const fn blue(a: u8) -> Rgba {
        Rgba::new(0, 0, 255, a)
    }
    pub const fn orange(a: u8) -> Rgba {
        Rgba::new(255, 175, 3, a)
    }

    // Status background tints
    pub const BG_DISENGAGED: Rgba = Rgba::new(0x17, 0x33, 0x49, 0xc8);
    pub const BG_ENGAGED: Rgba = Rgba::new(0x17, 0x86, 0x44, 0xf1);
    pub const BG_WARNING: Rgba = Rgba::new(0xDA, 0x6F, 0x25, 0xf1);
    pub const BG_ALERT: Rgba = Rgba::new(0xC9, 0x22, 0x31, 0xf1);

    // Max-speed box fills
    pub const BOX_OVER_LIMIT: Rgba = Rgba::new(218, 111, 37, 150);
    pub const BOX_LIMIT_OK: Rgba = Rgba::new(0, 120, 0, 150);
    pub const BOX_ACC: Rgba = Rgba::new(0, 100, 200, 150);
    pub const BOX_ENABLED: Rgba = Rgba::new(255, 255, 255, 75);
    pub const BOX_IDLE: Rgba = Rgba::new(0, 0, 0, 100);

    // Panel chrome
    pub const PANEL_BORDER: Rgba = Rgba::new(255, 255, 255, 80);
    pub const TPMS_IMBALANCE: Rgba = Rgba::new(255, 0, 0, 150);
    pub const DM_MODE_BG: Rgba = Rgba::new(10, 120, 20, 70);
    pub const DM_IDLE_BG: Rgba = Rgba::new(0, 0, 0, 70);

    // Lead marker glows
    pub const RADAR_GLOW: Rgba = Rgba::new(218, 202, 37, 255);
    pub const VISION_GLOW: Rgba = Rgba::new(0, 255, 0, 255);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32_clamps() {
        let c = Rgba::from_f32(1.5, -0.2, 0.5, f32::NAN);
        assert_eq!(c, Rgba::new(255, 0, 128, 0));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = colors::black(0);
        let b = colors::white(255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::new(128, 128, 128, 128));
    }
}
