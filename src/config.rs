//! Engine configuration
//!
//! All keys are optional; missing keys take their defaults.
//!
//! ```yaml
//! snapshot_rate: !Max 20
//! channel_capacity: 512
//! max_source_errors: 10
//! replay_rate_hz: 60.0
//! sample_retention: ReferenceLaps
//! first_snapshot_timeout_ms: 5000
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::types::UpdateRate;
use crate::{DeltaError, Result};

/// Lap data tick rate the game sends at by default
pub const DEFAULT_SOURCE_HZ: f64 = 60.0;

/// Which laps keep their distance samples after they complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleRetention {
    /// Keep every lap's samples for the whole session
    All,
    /// Keep samples only for laps that can still be a reference:
    /// the current, previous and best lap of each driver
    #[default]
    ReferenceLaps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default delivery rate for snapshot streams
    pub snapshot_rate: UpdateRate,
    /// Tick rate of lap data events, used to normalise `snapshot_rate`
    pub source_hz: f64,
    /// Buffer size of each per-event-type channel on the event bus
    pub channel_capacity: usize,
    /// Consecutive source errors tolerated before the engine stops
    pub max_source_errors: u32,
    /// Pace replayed events at this rate; unpaced when absent
    pub replay_rate_hz: Option<f64>,
    pub sample_retention: SampleRetention,
    /// How long opening a replay waits for the first snapshot
    pub first_snapshot_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapshot_rate: UpdateRate::Native,
            source_hz: DEFAULT_SOURCE_HZ,
            channel_capacity: 256,
            max_source_errors: 10,
            replay_rate_hz: None,
            sample_retention: SampleRetention::ReferenceLaps,
            first_snapshot_timeout_ms: 5_000,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml_ng::from_str(yaml).map_err(|e| {
            DeltaError::parse_error("Engine configuration", format!("YAML parsing failed: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine configuration {}", path.display()))?;
        Self::from_yaml_str(&yaml)
            .with_context(|| format!("loading engine configuration {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(DeltaError::invalid_config("channel_capacity must be at least 1"));
        }
        if self.max_source_errors == 0 {
            return Err(DeltaError::invalid_config("max_source_errors must be at least 1"));
        }
        if !(self.source_hz.is_finite() && self.source_hz > 0.0) {
            return Err(DeltaError::invalid_config("source_hz must be a positive number"));
        }
        if let Some(hz) = self.replay_rate_hz {
            if !(hz.is_finite() && hz > 0.0) {
                return Err(DeltaError::invalid_config("replay_rate_hz must be a positive number"));
            }
        }
        Ok(())
    }

    pub fn first_snapshot_timeout(&self) -> Duration {
        Duration::from_millis(self.first_snapshot_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_document_overrides_keys() {
        let config = EngineConfig::from_yaml_str(
            "snapshot_rate: !Max 20\nchannel_capacity: 32\nsample_retention: All\nreplay_rate_hz: 120.0\n",
        )
        .unwrap();

        assert_eq!(config.snapshot_rate, UpdateRate::Max(20));
        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.sample_retention, SampleRetention::All);
        assert_eq!(config.replay_rate_hz, Some(120.0));
        assert_eq!(config.max_source_errors, 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_yaml_str("channel_capacity: 0").unwrap_err();
        assert!(matches!(err, DeltaError::Config { .. }));

        let err = EngineConfig::from_yaml_str("replay_rate_hz: -5.0").unwrap_err();
        assert!(matches!(err, DeltaError::Config { .. }));

        let err = EngineConfig::from_yaml_str("channel_capacity: [1, 2]").unwrap_err();
        assert!(matches!(err, DeltaError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.yaml"));
    }
}
