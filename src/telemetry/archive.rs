//! Per-driver lap records and reference lap lookups

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::samples::LapSamples;
use crate::types::{LapData, LapHistoryData, Sector, TyreSetData};

/// Everything known about one lap of one driver
#[derive(Debug, Clone, Default)]
pub struct LapRecord {
    pub lap_number: u8,
    pub samples: LapSamples,
    /// Sector times in ms, 0 while unknown
    pub sector_ms: [u32; 3],
    /// Lap time in ms, 0 until the lap completes
    pub total_ms: u32,
}

impl LapRecord {
    pub fn new(lap_number: u8) -> Self {
        Self { lap_number, ..Default::default() }
    }

    /// A lap counts as complete once it has a finalized total
    pub fn is_complete(&self) -> bool {
        self.total_ms > 0
    }

    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Finalize with a total; sector 3 is derived when the first two are known
    fn complete(&mut self, total_ms: u32) {
        self.total_ms = total_ms;
        let [s1, s2, _] = self.sector_ms;
        self.sector_ms[2] =
            if s1 > 0 && s2 > 0 && total_ms > s1 + s2 { total_ms - s1 - s2 } else { 0 };
    }
}

/// Tyre set currently fitted to a car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedTyres {
    pub compound: u8,
    pub wear_pct: f32,
    pub life_span: u8,
}

impl From<&TyreSetData> for FittedTyres {
    fn from(set: &TyreSetData) -> Self {
        Self {
            compound: set.actual_tyre_compound,
            wear_pct: f32::from(set.wear),
            life_span: set.life_span,
        }
    }
}

/// State of one car slot within a session
#[derive(Debug, Clone)]
pub struct DriverState {
    pub index: usize,
    pub car_position: u8,
    pub laps: BTreeMap<u8, LapRecord>,
    /// 0 until the first lap data for this car arrives
    pub current_lap_number: u8,
    pub current_distance: f32,
    pub current_elapsed_ms: u32,
    pub current_sector: Sector,
    pub last_lap_time_ms: u32,
    pub tyres: Option<FittedTyres>,
}

impl DriverState {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            car_position: 0,
            laps: BTreeMap::new(),
            current_lap_number: 0,
            current_distance: 0.0,
            current_elapsed_ms: 0,
            current_sector: Sector::First,
            last_lap_time_ms: 0,
            tyres: None,
        }
    }

    pub fn lap(&self, lap_number: u8) -> Option<&LapRecord> {
        self.laps.get(&lap_number)
    }

    pub fn current_lap(&self) -> Option<&LapRecord> {
        self.lap(self.current_lap_number)
    }

    /// Completed lap with the lowest total; the earlier lap wins a tie
    pub fn best_lap(&self) -> Option<&LapRecord> {
        self.laps
            .values()
            .filter(|lap| lap.is_complete() && lap.lap_number < self.current_lap_number)
            .min_by_key(|lap| (lap.total_ms, lap.lap_number))
    }

    /// The lap immediately before `current_lap_number`, if recorded
    pub fn previous_lap(&self, current_lap_number: u8) -> Option<&LapRecord> {
        current_lap_number.checked_sub(1).and_then(|n| self.lap(n))
    }

    /// Sector times of the lap in progress: the third is derived from the
    /// running lap time while the car is in the final sector, 0 otherwise
    pub fn current_sector_times(&self) -> [u32; 3] {
        let Some(lap) = self.current_lap() else {
            return [0; 3];
        };
        let [s1, s2, _] = lap.sector_ms;
        let s3 = match self.current_sector {
            Sector::Third => self.current_elapsed_ms.saturating_sub(s1 + s2),
            _ => 0,
        };
        [s1, s2, s3]
    }

    /// Apply the lap bookkeeping of one lap data entry; samples are stored
    /// separately through [`DriverState::record_sample`].
    ///
    /// Returns `false` when the entry belongs to an earlier lap than the one
    /// already in progress and was ignored.
    pub fn apply_lap_data(&mut self, entry: &LapData) -> bool {
        let lap_number = entry.current_lap_num;
        if lap_number < self.current_lap_number {
            trace!(
                car = self.index,
                lap = lap_number,
                current = self.current_lap_number,
                "Ignoring lap data from an earlier lap"
            );
            return false;
        }

        if lap_number > self.current_lap_number && self.current_lap_number > 0 {
            self.last_lap_time_ms = entry.last_lap_time_ms;
            if let Some(finished) = lap_number.checked_sub(1).and_then(|n| self.laps.get_mut(&n)) {
                if entry.last_lap_time_ms > 0 && !finished.is_complete() {
                    finished.complete(entry.last_lap_time_ms);
                    debug!(
                        car = self.index,
                        lap = finished.lap_number,
                        total_ms = finished.total_ms,
                        "Lap completed"
                    );
                }
            }
        } else if entry.last_lap_time_ms > 0 {
            self.last_lap_time_ms = entry.last_lap_time_ms;
        }

        self.current_lap_number = lap_number;
        self.car_position = entry.car_position;
        self.current_distance = entry.lap_distance;
        self.current_elapsed_ms = entry.current_lap_time_ms;
        self.current_sector = entry.current_sector();

        if lap_number == 0 {
            return true;
        }

        let lap = self.laps.entry(lap_number).or_insert_with(|| LapRecord::new(lap_number));
        let (s1, s2) = (entry.sector1_ms(), entry.sector2_ms());
        if s1 > 0 {
            lap.sector_ms[0] = s1;
        }
        if s2 > 0 {
            lap.sector_ms[1] = s2;
        }
        true
    }

    /// Store one distance/time sample for `lap`; lap 0 is never sampled
    pub fn record_sample(&mut self, lap: u8, distance: f32, elapsed_ms: u32) -> bool {
        if lap == 0 {
            return false;
        }
        self.laps
            .entry(lap)
            .or_insert_with(|| LapRecord::new(lap))
            .samples
            .record(distance, elapsed_ms)
    }

    /// Apply authoritative times from the session history.
    ///
    /// Entry `k` describes lap `k + 1`. Laps without a lap time are still in
    /// progress and left alone.
    pub fn apply_history(&mut self, history: &[LapHistoryData]) {
        for (offset, entry) in history.iter().enumerate() {
            if entry.lap_time_ms == 0 {
                continue;
            }
            let Ok(lap_number) = u8::try_from(offset + 1) else {
                break;
            };
            if self.current_lap_number > 0 && lap_number >= self.current_lap_number {
                continue;
            }
            let lap = self.laps.entry(lap_number).or_insert_with(|| LapRecord::new(lap_number));
            lap.sector_ms = entry.sector_times_ms();
            lap.total_ms = entry.lap_time_ms;
        }
    }

    /// Release samples of laps that can no longer serve as a reference
    pub fn release_stale_samples(&mut self) {
        let best = self.best_lap().map(|lap| lap.lap_number);
        let current = self.current_lap_number;
        let previous = current.checked_sub(1);

        for lap in self.laps.values_mut() {
            let keep = lap.lap_number == current
                || Some(lap.lap_number) == previous
                || Some(lap.lap_number) == best;
            if !keep && lap.has_samples() {
                lap.samples.clear();
            }
        }
    }
}
