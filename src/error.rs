//! Error types for delta processing.
//!
//! The delta core itself never fails: missing reference data, stale session
//! identifiers and malformed samples all degrade to "no comparison available".
//! Errors only arise at the edges of the crate, where events are read from a
//! source, decoded, or where configuration is loaded.
//!
//! ## Error Categories
//!
//! - **Source Errors**: An event source failed or disconnected
//! - **File Errors**: Problems reading a recorded event log
//! - **Parse Errors**: Malformed event records or configuration documents
//! - **Config Errors**: Configuration values that cannot be used
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use lapdelta::DeltaError;
//!
//! let error = DeltaError::source_failed("relay went away");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for delta operations.
pub type Result<T, E = DeltaError> = std::result::Result<T, E>;

/// Main error type for delta operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeltaError {
    #[error("Event source failed: {reason}")]
    Source {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Event log error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Event channel for {kind} is closed")]
    ChannelClosed { kind: String },
}

impl DeltaError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeltaError::Source { .. } => true,
            DeltaError::Timeout { .. } => true,
            DeltaError::Parse { .. } => true,
            DeltaError::File { .. } => false,
            DeltaError::Config { .. } => false,
            DeltaError::ChannelClosed { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DeltaError::Source { .. } => vec![
                "Check that the telemetry relay is running",
                "Verify the game's UDP telemetry output is enabled",
                "Reconnect the event source",
            ],
            DeltaError::File { .. } => vec![
                "Check the event log exists and is readable",
                "Verify the log was written as JSON lines",
                "Check file permissions",
            ],
            DeltaError::Parse { .. } => vec![
                "Check the record matches the expected packet layout",
                "Verify the producer and consumer use the same game year",
                "Skip the malformed record and continue",
            ],
            DeltaError::Config { .. } => vec![
                "Check configuration values are within range",
                "Remove the key to fall back to its default",
            ],
            DeltaError::Timeout { .. } => vec![
                "Increase the first snapshot timeout",
                "Check that lap data events are being published",
            ],
            DeltaError::ChannelClosed { .. } => vec![
                "Keep the engine connection alive while publishing",
                "Create a new event bus",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        DeltaError::File { path, source }
    }

    /// Helper constructor for source errors.
    pub fn source_failed(reason: impl Into<String>) -> Self {
        DeltaError::Source { reason: reason.into(), source: None }
    }

    /// Helper constructor for source errors with an underlying cause.
    pub fn source_failed_with(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        DeltaError::Source { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        DeltaError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        DeltaError::Config { reason: reason.into() }
    }
}

impl From<std::io::Error> for DeltaError {
    fn from(err: std::io::Error) -> Self {
        DeltaError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_json::Error> for DeltaError {
    fn from(err: serde_json::Error) -> Self {
        DeltaError::Parse { context: "JSON event record".to_string(), details: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn error_messages_carry_their_context(
                reason in ".*",
                context in "\\w+",
                details in ".*",
                kind in "[a-zA-Z]+"
            ) {
                let source_msg = DeltaError::source_failed(reason.clone()).to_string();
                prop_assert!(source_msg.contains(&reason));

                let parse_msg = DeltaError::parse_error(context.clone(), details.clone()).to_string();
                prop_assert!(parse_msg.contains(&context));
                prop_assert!(parse_msg.contains(&details));

                let closed_msg = DeltaError::ChannelClosed { kind: kind.clone() }.to_string();
                prop_assert!(closed_msg.contains(&kind));
            }

            #[test]
            fn source_chain_reaches_the_root_cause(base_message in "[a-z ]{1,40}") {
                let root: Box<dyn std::error::Error + Send + Sync> =
                    Box::new(std::io::Error::other(base_message.clone()));
                let top = DeltaError::source_failed_with("relay", root);

                let cause = std::error::Error::source(&top).map(|e| e.to_string());
                prop_assert_eq!(cause, Some(base_message));
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<DeltaError>();

        let error = DeltaError::source_failed("test");
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn retry_classification() {
        assert!(DeltaError::source_failed("gone").is_retryable());
        assert!(DeltaError::parse_error("lapData", "missing field").is_retryable());
        assert!(!DeltaError::invalid_config("capacity").is_retryable());
        assert!(!DeltaError::ChannelClosed { kind: "lapData".into() }.is_retryable());

        for error in [
            DeltaError::source_failed("gone"),
            DeltaError::invalid_config("capacity"),
            DeltaError::Timeout { duration: Duration::from_secs(1) },
        ] {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty());
            assert!(suggestions.iter().all(|s| s.len() > 5));
        }
    }

    #[test]
    fn from_conversions_work() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "records.log");
        match DeltaError::from(io_err) {
            DeltaError::File { source, .. } => assert_eq!(source.to_string(), "records.log"),
            other => panic!("Expected File error, got {other:?}"),
        }

        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(DeltaError::from(json_err), DeltaError::Parse { .. }));
    }
}
