// src/main.rs
//
// Replay driver: streams recorded scene snapshots through the HUD pipeline
// onto an offscreen raster canvas and prints a metrics summary.

use anyhow::{Context, Result};
use onroad_hud::config::HudConfig;
use onroad_hud::pipeline::{snapshot_channel, HudEvent, HudPipeline, SnapshotPublisher};
use onroad_hud::render::{RasterCanvas, VideoFrame};
use onroad_hud::types::{LeadRecord, Point2, SceneSnapshot, Status};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Camera frame size the default intrinsics are calibrated for.
const CAMERA_W: u32 = 1928;
const CAMERA_H: u32 = 1208;
/// Length of the built-in drive when no recording is available.
const SYNTHETIC_SECONDS: u64 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "hud.yaml".to_string());
    let config = if Path::new(&config_path).exists() {
        HudConfig::load(&config_path)?
    } else {
        HudConfig::default()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("onroad_hud={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 onroad HUD replay starting");
    info!(
        "Surface {}x{}, ui_freq={} Hz, debug_level={}, stock_ui={}",
        config.surface.width,
        config.surface.height,
        config.pacing.ui_freq,
        config.display.debug_level,
        config.display.stock_ui
    );

    let snapshots = if Path::new(&config.replay.input).exists() {
        let s = load_replay(&config.replay.input)?;
        info!("✓ Loaded {} snapshots from {}", s.len(), config.replay.input);
        s
    } else {
        warn!(
            "Replay file {} not found, using a synthetic drive",
            config.replay.input
        );
        synthetic_drive(config.replay.telemetry_hz.max(1) as u64 * SYNTHETIC_SECONDS)
    };

    let (publisher, mut receiver) = snapshot_channel();
    let producer = tokio::spawn(publish_replay(publisher, snapshots, config.clone()));

    let mut pipeline = HudPipeline::new(&config);
    let mut canvas = RasterCanvas::new(config.surface.width, config.surface.height);
    let frame = synthetic_frame(CAMERA_W, CAMERA_H);

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(
        1.0 / config.pacing.ui_freq as f64,
    ));
    loop {
        ticker.tick().await;
        if producer.is_finished() && !receiver.has_new() {
            break;
        }
        let snapshot = receiver.latest();
        let outcome = pipeline.tick(&mut canvas, Some(&frame), &snapshot);
        if outcome.alert.changed {
            debug!("Frame {}: alert now '{}'", snapshot.frame, outcome.alert.alert.alert_type);
        }
        for event in pipeline.drain_events() {
            match event {
                HudEvent::AlertActivated(alert) => {
                    info!("🔔 {} | {} {}", alert.alert_type, alert.text1, alert.text2)
                }
                HudEvent::SlowFrame(slow) => debug!("slow frame event: {:.2} ms", slow.interval_ms),
            }
        }
    }
    producer.await??;

    let summary = pipeline.metrics().summary();
    info!(
        "✓ Rendered {} frames ({:.1} fps), {} alerts, {} slow frames",
        summary.total_frames, summary.fps, summary.alerts_activated, summary.slow_frames
    );
    let report = serde_json::json!({
        "metrics": summary,
        "last_frame_sha256": canvas.digest(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// JSON-lines recording, one `SceneSnapshot` per line. Blank lines are skipped.
fn load_replay(path: &str) -> Result<Vec<SceneSnapshot>> {
    let file = File::open(path).with_context(|| format!("opening replay {}", path))?;
    let mut snapshots = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let snapshot: SceneSnapshot = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: bad snapshot", path, i + 1))?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

/// Publish at the telemetry rate, stamping the configured display settings
/// and units into every snapshot.
async fn publish_replay(
    publisher: SnapshotPublisher,
    snapshots: Vec<SceneSnapshot>,
    config: HudConfig,
) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(
        1.0 / config.replay.telemetry_hz.max(1) as f64,
    ));
    for (i, mut snapshot) in snapshots.into_iter().enumerate() {
        ticker.tick().await;
        snapshot.frame = i as u64;
        snapshot.units = config.units;
        snapshot.display.settings = config.display;
        publisher.publish(snapshot);
    }
    // let the render loop pick up the final snapshot
    ticker.tick().await;
    Ok(())
}

fn lane_quad(bottom_x: f32, top_x: f32, half_w: f32) -> Vec<Point2> {
    vec![
        Point2::new(bottom_x - half_w, 1208.0),
        Point2::new(bottom_x + half_w, 1208.0),
        Point2::new(top_x + half_w * 0.2, 640.0),
        Point2::new(top_x - half_w * 0.2, 640.0),
    ]
}

/// Engage, follow a slowing lead to a stop, sit at standstill.
fn synthetic_drive(frames: u64) -> Vec<SceneSnapshot> {
    (0..frames)
        .map(|i| {
            let t = i as f32 / frames.max(1) as f32;
            let mut snap = SceneSnapshot {
                v_ego: (25.0 * (1.0 - t * 1.25)).max(0.0),
                status: if t < 0.1 { Status::Disengaged } else { Status::Engaged },
                lane_line_probs: vec![0.3, 0.9, 0.9, 0.3],
                lane_lines: vec![
                    lane_quad(300.0, 880.0, 12.0),
                    lane_quad(620.0, 930.0, 12.0),
                    lane_quad(1310.0, 1000.0, 12.0),
                    lane_quad(1630.0, 1050.0, 12.0),
                ],
                road_edges: vec![lane_quad(100.0, 860.0, 20.0), lane_quad(1830.0, 1070.0, 20.0)],
                road_edge_stds: vec![0.4, 0.6],
                path: lane_quad(964.0, 964.0, 180.0),
                leads: vec![LeadRecord {
                    d_rel: 35.0 - 25.0 * t,
                    v_rel: -3.0 * (1.0 - t),
                    y_rel: 0.2,
                    valid: true,
                }],
                radar_distance: Some(35.0 - 25.0 * t),
                ..Default::default()
            };
            snap.controls.enabled = t >= 0.1;
            snap.controls.engageable = true;
            snap.cruise.v_cruise = 100.0;
            snap.cruise.set_speed = 100.0;
            snap.cruise.acc_active = t >= 0.1;
            snap.steering.angle_deg = 8.0 * (t * 12.0).sin();
            snap.steering.output_scale = 0.3;
            snap.steering.steer_max = 1.0;
            snap.standstill.active = snap.v_ego == 0.0;
            snap.standstill.elapsed_s = ((t - 0.8).max(0.0) * frames as f32) / 20.0;
            snap.driver_monitoring.active = true;
            snap.device.cpu_temp = 62.0;
            snap.device.tire_pressures.fl = 35.0;
            snap.device.tire_pressures.fr = 35.5;
            snap.device.tire_pressures.rl = 34.0;
            snap.device.tire_pressures.rr = 34.5;
            snap
        })
        .collect()
}

/// Flat sky over grey road, RGB.
fn synthetic_frame(width: u32, height: u32) -> VideoFrame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        let px: [u8; 3] = if y < height / 2 { [110, 140, 170] } else { [70, 70, 72] };
        for _ in 0..width {
            data.extend_from_slice(&px);
        }
    }
    VideoFrame {
        width,
        height,
        channels: 3,
        data,
    }
}
