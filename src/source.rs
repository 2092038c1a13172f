//! Source trait for telemetry events

use crate::Result;
use crate::types::TelemetryEvent;

/// Anything that can hand the engine decoded telemetry events
///
/// Sources own their own pacing: a replay may sleep between records, a bus
/// subscriber waits on its channels.
#[async_trait::async_trait]
pub trait EventSource: Send + 'static {
    /// Next event in arrival order
    ///
    /// Returns:
    /// - `Ok(Some(event))` - New event available
    /// - `Ok(None)` - Stream ended (normal termination)
    /// - `Err(e)` - Error occurred; the engine may call again
    async fn next_event(&mut self) -> Result<Option<TelemetryEvent>>;

    /// Tick rate of lap data events in Hz, when the source knows it
    fn tick_rate(&self) -> Option<f64> {
        None
    }
}

#[async_trait::async_trait]
impl EventSource for Box<dyn EventSource> {
    async fn next_event(&mut self) -> Result<Option<TelemetryEvent>> {
        (**self).next_event().await
    }

    fn tick_rate(&self) -> Option<f64> {
        (**self).tick_rate()
    }
}
