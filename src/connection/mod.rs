//! Consumer handle for a running engine

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::analysis::DeltaSnapshot;
use crate::config::EngineConfig;
use crate::driver::Engine;
use crate::source::EventSource;
use crate::sources::{EventBus, EventPublisher, ReplaySource};
use crate::stream::ThrottleExt;
use crate::types::UpdateRate;
use crate::{DeltaError, Result};

#[cfg(test)]
mod tests;

/// Handle on a running engine. Dropping it stops the engine.
pub struct DeltaConnection {
    snapshots: watch::Receiver<Option<Arc<DeltaSnapshot>>>,
    default_rate: UpdateRate,
    source_hz: f64,
    cancel: CancellationToken,
}

impl DeltaConnection {
    /// Start an engine over any event source
    pub fn spawn<S: EventSource>(source: S, config: &EngineConfig) -> Self {
        let source_hz = source.tick_rate().unwrap_or(config.source_hz);
        let channels = Engine::spawn(source, config);
        Self {
            snapshots: channels.snapshots,
            default_rate: config.snapshot_rate,
            source_hz,
            cancel: channels.cancel,
        }
    }

    /// Replay a relay log.
    ///
    /// Waits up to the configured timeout for the first snapshot so that
    /// subscribers see data immediately; a log without any lap data still
    /// opens.
    pub async fn open_replay<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        info!(path = %path.display(), "Opening replay");

        let source = ReplaySource::open(path)?.with_rate(config.replay_rate_hz);
        let connection = Self::spawn(source, config);

        if let Err(e) = connection.first_snapshot(config.first_snapshot_timeout()).await {
            warn!(error = %e, "No snapshot from replay yet");
        }
        Ok(connection)
    }

    /// Start an engine fed by an in-process event bus
    pub fn bus(config: &EngineConfig) -> Result<(EventPublisher, Self)> {
        config.validate()?;
        let (publisher, subscriber) = EventBus::channel(config.channel_capacity);
        Ok((publisher, Self::spawn(subscriber, config)))
    }

    /// Snapshot stream at `rate`.
    ///
    /// Yields the current snapshot first when there is one. Ends when the
    /// engine stops.
    pub fn snapshots(&self, rate: UpdateRate) -> BoxStream<'static, Arc<DeltaSnapshot>> {
        let snapshots =
            WatchStream::new(self.snapshots.clone()).filter_map(|opt| async move { opt });

        match rate.interval(self.source_hz) {
            None => snapshots.boxed(),
            Some(interval) => snapshots.throttle(interval).boxed(),
        }
    }

    /// Snapshot stream at the configured default rate
    pub fn snapshot_updates(&self) -> BoxStream<'static, Arc<DeltaSnapshot>> {
        self.snapshots(self.default_rate)
    }

    /// Most recent snapshot, if any lap data has been processed
    pub fn latest(&self) -> Option<Arc<DeltaSnapshot>> {
        self.snapshots.borrow().clone()
    }

    /// Wait until a snapshot exists, at most `timeout`
    pub async fn first_snapshot(&self, timeout: Duration) -> Result<Arc<DeltaSnapshot>> {
        let mut snapshots = self.snapshots.clone();
        let wait = async {
            loop {
                if let Some(snapshot) = snapshots.borrow_and_update().clone() {
                    return Ok(snapshot);
                }
                if snapshots.changed().await.is_err() {
                    return Err(DeltaError::ChannelClosed { kind: "snapshots".into() });
                }
            }
        };
        tokio::time::timeout(timeout, wait).await.map_err(|_| DeltaError::Timeout { duration: timeout })?
    }

    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    /// Whether the engine is still consuming events
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Resolves once the engine has stopped
    pub async fn finished(&self) {
        self.cancel.cancelled().await;
    }

    /// Stop the engine; streams end after their last snapshot
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for DeltaConnection {
    fn drop(&mut self) {
        debug!("Dropping delta connection");
        self.cancel.cancel();
    }
}
