//! Engine task: the single consumer of telemetry events

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::analysis::DeltaSnapshot;
use crate::config::EngineConfig;
use crate::session::SessionState;
use crate::source::EventSource;

/// Result of spawning the engine
pub struct EngineChannels {
    /// Latest snapshot, `None` until the first lap data tick
    pub snapshots: watch::Receiver<Option<Arc<DeltaSnapshot>>>,
    /// Cancelled to stop the engine; also cancelled by the engine when it exits
    pub cancel: CancellationToken,
}

/// Owns an [`EventSource`] and the [`SessionState`] on one task.
///
/// Each event is applied before the next is read, and every lap data event
/// publishes a fresh snapshot.
pub struct Engine;

impl Engine {
    /// Spawn the engine task for `source`
    pub fn spawn<S>(source: S, config: &EngineConfig) -> EngineChannels
    where
        S: EventSource,
    {
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();
        let state = SessionState::new(config.sample_retention);
        let max_errors = config.max_source_errors.max(1);

        tokio::spawn(async move {
            Self::event_loop(source, state, snapshot_tx, max_errors, cancel_task.clone()).await;
            cancel_task.cancel();
        });

        EngineChannels { snapshots: snapshot_rx, cancel }
    }

    async fn event_loop<S>(
        mut source: S,
        mut state: SessionState,
        snapshot_tx: watch::Sender<Option<Arc<DeltaSnapshot>>>,
        max_errors: u32,
        cancel: CancellationToken,
    ) where
        S: EventSource,
    {
        info!("Engine started");
        let mut event_count = 0u64;
        let mut snapshot_count = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Engine cancelled");
                    break;
                }
                result = source.next_event() => result,
            };

            match result {
                Ok(Some(event)) => {
                    event_count += 1;
                    error_count = 0;
                    trace!(event = event_count, kind = %event.kind(), session_uid = event.session_uid(), "Event");

                    let Some(snapshot) = state.apply(&event) else {
                        continue;
                    };
                    snapshot_count += 1;
                    if snapshot_tx.send(Some(Arc::new(snapshot))).is_err() {
                        debug!("Snapshot receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!(events = event_count, "Event source ended");
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!(attempt = error_count, max = max_errors, error = %e, "Event source error");

                    if !e.is_retryable() || error_count >= max_errors {
                        error!("Event source failed, shutting down");
                        break;
                    }

                    // 50ms, 100ms, 200ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!(events = event_count, snapshots = snapshot_count, "Engine stopped");
    }
}
