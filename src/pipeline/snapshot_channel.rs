// src/pipeline/snapshot_channel.rs
//
// Latest-value handoff from the telemetry producer to the render loop.
// One writer; readers clone the Arc and let go of the channel before
// painting, so a frame never waits on the producer or sees half an update.

use std::sync::Arc;
use tokio::sync::watch;

use crate::types::SceneSnapshot;

pub fn snapshot_channel() -> (SnapshotPublisher, SnapshotReceiver) {
    let (tx, rx) = watch::channel(Arc::new(SceneSnapshot::default()));
    (SnapshotPublisher { tx }, SnapshotReceiver { rx })
}

pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<SceneSnapshot>>,
}

impl SnapshotPublisher {
    /// Replace the current snapshot. Works with or without live receivers.
    pub fn publish(&self, snapshot: SceneSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        SnapshotReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Clone)]
pub struct SnapshotReceiver {
    rx: watch::Receiver<Arc<SceneSnapshot>>,
}

impl SnapshotReceiver {
    /// Most recent snapshot; marks it seen.
    pub fn latest(&mut self) -> Arc<SceneSnapshot> {
        self.rx.borrow_and_update().clone()
    }

    /// A snapshot arrived since the last `latest()`.
    pub fn has_new(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next snapshot. Errors once the publisher is gone.
    pub async fn changed(&mut self) -> anyhow::Result<()> {
        self.rx.changed().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(frame: u64) -> SceneSnapshot {
        SceneSnapshot {
            frame,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_reader_sees_only_latest() {
        let (tx, mut rx) = snapshot_channel();
        tx.publish(snap(1));
        tx.publish(snap(2));
        tx.publish(snap(3));
        assert!(rx.has_new());
        assert_eq!(rx.latest().frame, 3);
        assert!(!rx.has_new());
    }

    #[tokio::test]
    async fn test_held_snapshot_is_immutable() {
        let (tx, mut rx) = snapshot_channel();
        tx.publish(snap(7));
        let held = rx.latest();
        tx.publish(snap(8));
        assert_eq!(held.frame, 7);
        assert_eq!(rx.latest().frame, 8);
    }

    #[tokio::test]
    async fn test_changed_wakes_reader() {
        let (tx, mut rx) = snapshot_channel();
        let producer = tokio::spawn(async move {
            tx.publish(snap(42));
            tx
        });
        rx.changed().await.unwrap();
        assert_eq!(rx.latest().frame, 42);
        drop(producer.await.unwrap());
        assert!(rx.changed().await.is_err());
    }
}
