//! Replay of recorded relay logs
//!
//! A log holds one JSON record per line:
//!
//! ```json
//! {"timestamp": 1700000000000, "type": "lapData", "data": {"m_header": {...}, "m_lapData": [...]}}
//! ```
//!
//! Records of event types the engine does not consume are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;
use tokio::time::{Duration, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::source::EventSource;
use crate::types::TelemetryEvent;
use crate::{DeltaError, Result};

#[derive(Deserialize)]
struct RecordLine {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Event source reading a relay log
pub struct ReplaySource<R = BufReader<File>> {
    reader: R,
    line_number: u64,
    events: u64,
    skipped: u64,
    pacing: Option<Interval>,
    rate_hz: Option<f64>,
}

impl ReplaySource {
    /// Open a log file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DeltaError::file_error(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Opened event log");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead + Send + 'static> ReplaySource<R> {
    /// Replay from any buffered reader, unpaced
    pub fn from_reader(reader: R) -> Self {
        Self { reader, line_number: 0, events: 0, skipped: 0, pacing: None, rate_hz: None }
    }

    /// Emit at most `hz` events per second; `None` replays as fast as the
    /// consumer reads
    pub fn with_rate(mut self, hz: Option<f64>) -> Self {
        self.rate_hz = hz.filter(|hz| hz.is_finite() && *hz > 0.0);
        self.pacing = self.rate_hz.map(|hz| {
            let mut pacing = interval(Duration::from_secs_f64(1.0 / hz));
            pacing.set_missed_tick_behavior(MissedTickBehavior::Delay);
            pacing
        });
        self
    }

    /// Records skipped so far because of their event type
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    fn read_record(&mut self) -> Result<Option<TelemetryEvent>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: RecordLine = serde_json::from_str(trimmed).map_err(|e| {
                DeltaError::parse_error(format!("event log line {}", self.line_number), e.to_string())
            })?;

            match TelemetryEvent::from_record(&record.kind, record.data)? {
                Some(event) => return Ok(Some(event)),
                None => {
                    trace!(line = self.line_number, kind = %record.kind, "Skipping record");
                    self.skipped += 1;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<R: BufRead + Send + 'static> EventSource for ReplaySource<R> {
    async fn next_event(&mut self) -> Result<Option<TelemetryEvent>> {
        if let Some(pacing) = self.pacing.as_mut() {
            pacing.tick().await;
        }

        let event = self.read_record()?;
        match &event {
            Some(event) => {
                self.events += 1;
                trace!(line = self.line_number, kind = %event.kind(), "Replayed record");
            }
            None => debug!(
                events = self.events,
                skipped = self.skipped,
                lines = self.line_number,
                "Reached end of event log"
            ),
        }
        Ok(event)
    }

    fn tick_rate(&self) -> Option<f64> {
        self.rate_hz
    }
}
