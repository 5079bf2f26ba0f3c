// src/config.rs

use crate::types::{DisplaySettings, UnitSystem};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    pub units: UnitSystem,
    pub display: DisplaySettings,
    pub camera: CameraConfig,
    pub surface: SurfaceConfig,
    pub pacing: PacingConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub focal_length: f32,
    pub principal_point: [f32; 2],
    /// Wide-angle road camera (halves the zoom)
    pub wide: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            focal_length: 2648.0,
            principal_point: [964.0, 604.0],
            wide: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 2160,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Nominal UI refresh rate, Hz
    pub ui_freq: u32,
    /// Paint intervals above this are reported as slow
    pub slow_frame_ms: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            ui_freq: 20,
            slow_frame_ms: 66.0,
        }
    }
}

impl PacingConfig {
    /// Throttled fields refresh every `ui_freq / 2` frames (2 Hz).
    pub fn throttle_frames(&self) -> u64 {
        u64::from((self.ui_freq / 2).max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// JSON-lines file of scene snapshots
    pub input: String,
    pub telemetry_hz: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input: "telemetry.jsonl".to_string(),
            telemetry_hz: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HudConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: HudConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.display.debug_level > 2 {
            anyhow::bail!("display.debug_level must be 0, 1 or 2");
        }
        if self.surface.width == 0 || self.surface.height == 0 {
            anyhow::bail!("surface size must be non-zero");
        }
        if self.pacing.ui_freq == 0 {
            anyhow::bail!("pacing.ui_freq must be non-zero");
        }
        if !(self.camera.focal_length.is_finite() && self.camera.focal_length > 0.0) {
            anyhow::bail!("camera.focal_length must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LaneMode, TpmsUnit};

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let config = HudConfig::from_yaml(
            "units: imperial\ndisplay:\n  debug_level: 2\n  lane_mode: less\n  tpms_unit: bar\n",
        )
        .unwrap();

        assert_eq!(config.units, UnitSystem::Imperial);
        assert_eq!(config.display.debug_level, 2);
        assert_eq!(config.display.lane_mode, LaneMode::Less);
        assert_eq!(config.display.tpms_unit, TpmsUnit::Bar);
        assert!(!config.display.stock_ui);
        assert_eq!(config.pacing.ui_freq, 20);
        assert_eq!(config.surface.width, 2160);
    }

    #[test]
    fn test_rejects_bad_debug_level() {
        assert!(HudConfig::from_yaml("display:\n  debug_level: 3\n").is_err());
    }

    #[test]
    fn test_throttle_frames() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.throttle_frames(), 10);
        let slow = PacingConfig {
            ui_freq: 1,
            ..Default::default()
        };
        assert_eq!(slow.throttle_frames(), 1);
    }
}
