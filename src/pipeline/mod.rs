// src/pipeline/mod.rs

pub mod event_bus;
pub mod metrics;
pub mod orchestrator;
pub mod pacer;
pub mod snapshot_channel;

pub use event_bus::{EventBus, HudEvent};
pub use metrics::{HudMetrics, MetricsSummary};
pub use orchestrator::{FrameOutcome, HudPipeline};
pub use pacer::{FramePacer, SlowFrame};
pub use snapshot_channel::{snapshot_channel, SnapshotPublisher, SnapshotReceiver};
