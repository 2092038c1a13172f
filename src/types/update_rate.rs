//! Delivery rate control for delta snapshots

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate at which snapshots are handed to a consumer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every snapshot, one per lap data tick
    #[default]
    Native,

    /// At most this many snapshots per second, latest wins.
    /// A rate at or above the source tick rate, or zero, means Native.
    Max(u32),
}

impl UpdateRate {
    /// Resolve the effective rate for a source ticking at `source_hz`
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if f64::from(hz) >= source_hz => UpdateRate::Native,
            other => other,
        }
    }

    /// Minimum spacing between deliveries, `None` when unthrottled
    pub fn interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_above_source_are_native() {
        assert_eq!(UpdateRate::Max(120).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(60).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(0).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(20).normalize(60.0), UpdateRate::Max(20));
    }

    #[test]
    fn interval_only_when_throttled() {
        assert_eq!(UpdateRate::Native.interval(60.0), None);
        assert_eq!(UpdateRate::Max(10).interval(60.0), Some(Duration::from_millis(100)));
    }

    #[test]
    fn deserializes_from_yaml() {
        let rate: UpdateRate = serde_yaml_ng::from_str("!Max 15").unwrap();
        assert_eq!(rate, UpdateRate::Max(15));
        let rate: UpdateRate = serde_yaml_ng::from_str("Native").unwrap();
        assert_eq!(rate, UpdateRate::Native);
    }
}
