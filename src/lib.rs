//! Real-time lap delta computation from racing game telemetry.
//!
//! lapdelta consumes decoded telemetry events (lap data, session history,
//! tyre sets, participants, session and car status) and, on every lap data
//! tick, compares the local driver's current lap against up to four
//! reference laps.
//!
//! # Features
//!
//! - **Reference laps**: previous lap, personal best, overall best, and the
//!   best lap of the driver on the closest tyre wear
//! - **Distance based**: reference times are interpolated at the local car's
//!   exact lap distance
//! - **Session aware**: a new session identifier discards all state
//! - **Streaming**: snapshots over `tokio` watch channels, optionally throttled
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lapdelta::{LapDelta, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = LapDelta::replay("session.jsonl").await?;
//!     let mut snapshots = connection.snapshots(UpdateRate::Max(10));
//!
//!     while let Some(snapshot) = snapshots.next().await {
//!         println!("{}", snapshot);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod analysis;
pub mod config;
mod error;
mod serde_utils;
pub mod session;
pub mod telemetry;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Event transport
pub mod connection;
pub mod driver;
pub mod source;
pub mod sources;
pub mod stream;

pub use analysis::{
    DeltaEngine, DeltaSnapshot, FuelStatus, NeighbourLap, SessionConditions, TargetDelta,
    TargetKind, TyreStatus,
};
pub use config::{EngineConfig, SampleRetention};
pub use connection::DeltaConnection;
pub use error::*;
pub use session::{SessionContext, SessionPhase, SessionState};
pub use source::EventSource;
pub use sources::{EventBus, EventPublisher, EventSubscriber, ReplaySource};
pub use types::*;

/// Entry point for delta connections.
///
/// # Examples
///
/// ## Replay a recorded relay log
/// ```rust,no_run
/// use lapdelta::LapDelta;
///
/// #[tokio::main]
/// async fn main() -> lapdelta::Result<()> {
///     let connection = LapDelta::replay("session.jsonl").await?;
///     println!("{:?}", connection.latest());
///     Ok(())
/// }
/// ```
///
/// ## Feed events from a decoder
/// ```rust,no_run
/// use lapdelta::{EngineConfig, LapDelta, TelemetryEvent};
///
/// # async fn decoded() -> Option<TelemetryEvent> { None }
/// #[tokio::main]
/// async fn main() -> lapdelta::Result<()> {
///     let (publisher, connection) = LapDelta::bus(&EngineConfig::default())?;
///     while let Some(event) = decoded().await {
///         publisher.publish(event).await?;
///     }
///     Ok(())
/// }
/// ```
pub struct LapDelta;

impl LapDelta {
    /// Replay a relay log with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn replay<P: AsRef<std::path::Path>>(path: P) -> Result<DeltaConnection> {
        DeltaConnection::open_replay(path, &EngineConfig::default()).await
    }

    /// Replay a relay log with an explicit configuration
    pub async fn replay_with<P: AsRef<std::path::Path>>(
        path: P,
        config: &EngineConfig,
    ) -> Result<DeltaConnection> {
        DeltaConnection::open_replay(path, config).await
    }

    /// Start an engine fed through an in-process event bus.
    ///
    /// Must be called from within a tokio runtime. The engine stops when
    /// every publisher and the connection are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::Config`] when `config` does not validate.
    pub fn bus(config: &EngineConfig) -> Result<(EventPublisher, DeltaConnection)> {
        DeltaConnection::bus(config)
    }
}
