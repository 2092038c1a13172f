//! Millisecond time formatting for lap times and deltas

use serde::{Deserialize, Serialize};

/// A signed duration in milliseconds, displayed the way timing screens do.
///
/// Leading zero components are omitted: `.250`, `12.345`, `01:32.101`,
/// `-00.420` is written as `-.420`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapTime(pub i64);

impl LapTime {
    pub fn from_ms(ms: impl Into<i64>) -> Self {
        LapTime(ms.into())
    }

    /// Build from whole seconds, as used by session countdowns
    pub fn from_secs(secs: impl Into<i64>) -> Self {
        LapTime(secs.into() * 1000)
    }

    pub fn as_ms(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LapTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        let millis = total % 1000;
        let secs = total / 1000;
        let minutes = secs / 60;
        let seconds = secs % 60;

        f.write_str(sign)?;
        if minutes > 0 {
            write!(f, "{:02}:{:02}", minutes, seconds)?;
        } else if secs > 0 {
            write!(f, "{:02}", seconds)?;
        }
        write!(f, ".{:03}", millis)
    }
}
