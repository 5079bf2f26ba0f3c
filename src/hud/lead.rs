// src/hud/lead.rs
//
// Lead-vehicle marker geometry: chevron size from distance, fill opacity
// from proximity and closing rate.

use crate::types::{LeadRecord, SceneSnapshot};

/// Distance (m) at which the chevron starts to fill in.
pub const LEAD_BUFFER: f32 = 40.0;
/// Closing speed (m/s) that adds a full 255 of opacity.
pub const SPEED_BUFFER: f32 = 10.0;
/// Second lead within this distance of the first is the same vehicle.
pub const DUPLICATE_LEAD_GAP: f32 = 3.0;
/// `radar_distance` below this means the lead comes from radar.
pub const RADAR_RANGE: f32 = 149.0;

const SIZE_SCALE: f32 = 2.35;
const SIZE_MIN: f32 = 15.0;
const SIZE_MAX: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSource {
    Radar,
    Vision,
}

impl LeadSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Radar => "R",
            Self::Vision => "V",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadMarker {
    pub lead: LeadRecord,
    /// Chevron half-height in pixels
    pub size: f32,
    /// Chevron fill alpha
    pub alpha: u8,
    pub source: LeadSource,
}

/// Fill opacity for a lead at `d_rel` meters closing at `v_rel` m/s.
pub fn lead_alpha(d_rel: f32, v_rel: f32) -> u8 {
    if !(d_rel.is_finite() && v_rel.is_finite()) || d_rel >= LEAD_BUFFER {
        return 0;
    }
    let mut alpha = 255.0 * (1.0 - d_rel / LEAD_BUFFER);
    if v_rel < 0.0 {
        alpha += 255.0 * (-v_rel / SPEED_BUFFER);
    }
    alpha.clamp(0.0, 255.0) as u8
}

pub fn lead_marker_size(d_rel: f32) -> f32 {
    let d = if d_rel.is_finite() { d_rel.max(0.0) } else { 0.0 };
    ((25.0 * 30.0) / (d / 3.0 + 30.0)).clamp(SIZE_MIN, SIZE_MAX) * SIZE_SCALE
}

/// The second lead is only drawn when it is clearly a different vehicle.
pub fn show_second_lead(first_d: f32, second_d: f32) -> bool {
    (first_d - second_d).abs() > DUPLICATE_LEAD_GAP
}

/// No radar reading counts as vision.
pub fn lead_source(radar_distance: Option<f32>) -> LeadSource {
    match radar_distance {
        Some(d) if d < RADAR_RANGE => LeadSource::Radar,
        _ => LeadSource::Vision,
    }
}

fn marker(lead: &LeadRecord, source: LeadSource) -> LeadMarker {
    LeadMarker {
        lead: *lead,
        size: lead_marker_size(lead.d_rel),
        alpha: lead_alpha(lead.d_rel, lead.v_rel),
        source,
    }
}

/// Markers to draw, nearest first.
pub fn lead_markers(snapshot: &SceneSnapshot) -> Vec<LeadMarker> {
    let source = lead_source(snapshot.radar_distance);
    let mut markers = Vec::with_capacity(2);

    let first = snapshot.lead_one();
    if let Some(one) = first {
        markers.push(marker(one, source));
    }
    if let Some(two) = snapshot.lead_two() {
        // with no usable first lead there is nothing to duplicate
        let distinct = first.map_or(true, |one| show_second_lead(one.d_rel, two.d_rel));
        if distinct {
            markers.push(marker(two, source));
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(d_rel: f32, v_rel: f32) -> LeadRecord {
        LeadRecord {
            d_rel,
            v_rel,
            y_rel: 0.0,
            valid: true,
        }
    }

    #[test]
    fn test_alpha_ramp() {
        assert_eq!(lead_alpha(0.0, 0.0), 255);
        assert_eq!(lead_alpha(20.0, 0.0), 127);
        assert_eq!(lead_alpha(40.0, 0.0), 0);
        assert_eq!(lead_alpha(80.0, -30.0), 0);
    }

    #[test]
    fn test_alpha_boost_when_closing() {
        let steady = lead_alpha(30.0, 0.0);
        let closing = lead_alpha(30.0, -2.0);
        assert!(closing > steady);
        // receding adds nothing
        assert_eq!(lead_alpha(30.0, 5.0), steady);
        assert_eq!(lead_alpha(5.0, -50.0), 255);
    }

    #[test]
    fn test_alpha_non_increasing_in_distance() {
        for v_rel in [0.0f32, -1.0, -4.0, -12.0] {
            let mut last = u8::MAX;
            let mut d = 0.0f32;
            while d <= 60.0 {
                let a = lead_alpha(d, v_rel);
                assert!(a <= last, "alpha rose at d={} v={}", d, v_rel);
                last = a;
                d += 0.25;
            }
        }
    }

    #[test]
    fn test_marker_size_is_clamped() {
        assert!((lead_marker_size(0.0) - 25.0 * SIZE_SCALE).abs() < 1e-3);
        assert!((lead_marker_size(1000.0) - SIZE_MIN * SIZE_SCALE).abs() < 1e-3);
        assert!(lead_marker_size(f32::NAN).is_finite());
    }

    #[test]
    fn test_second_lead_suppression() {
        assert!(!show_second_lead(20.0, 23.0));
        assert!(!show_second_lead(23.0, 20.0));
        assert!(show_second_lead(20.0, 23.5));

        let snap = SceneSnapshot {
            leads: vec![lead(20.0, 0.0), lead(22.0, 0.0)],
            ..Default::default()
        };
        assert_eq!(lead_markers(&snap).len(), 1);

        let snap = SceneSnapshot {
            leads: vec![lead(20.0, 0.0), lead(45.0, 0.0)],
            ..Default::default()
        };
        let markers = lead_markers(&snap);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].lead.d_rel, 20.0);
    }

    #[test]
    fn test_radar_vs_vision_source() {
        assert_eq!(lead_source(Some(60.0)), LeadSource::Radar);
        assert_eq!(lead_source(Some(149.0)), LeadSource::Vision);
        assert_eq!(lead_source(Some(255.0)), LeadSource::Vision);
        assert_eq!(lead_source(None), LeadSource::Vision);
    }

    #[test]
    fn test_missing_radar_distance_reads_as_vision() {
        let snap: SceneSnapshot =
            serde_json::from_str(r#"{"leads": [{"d_rel": 20.0, "valid": true}]}"#).unwrap();
        assert_eq!(snap.radar_distance, None);
        assert_eq!(lead_markers(&snap)[0].source, LeadSource::Vision);

        let snap: SceneSnapshot = serde_json::from_str(
            r#"{"leads": [{"d_rel": 20.0, "valid": true}], "radar_distance": 20.0}"#,
        )
        .unwrap();
        assert_eq!(lead_markers(&snap)[0].source, LeadSource::Radar);
    }

    #[test]
    fn test_no_markers_without_valid_leads() {
        let snap = SceneSnapshot {
            leads: vec![LeadRecord::default(), LeadRecord::default()],
            ..Default::default()
        };
        assert!(lead_markers(&snap).is_empty());
    }
}
