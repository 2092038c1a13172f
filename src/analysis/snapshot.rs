//! Snapshot handed to the presentation layer after every lap data tick

use serde::{Deserialize, Serialize};

use crate::types::{LapTime, WeatherChange};

/// Which reference lap a delta compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TargetKind {
    /// The local driver's lap before the current one
    PreviousLap,
    /// The local driver's fastest completed lap
    PersonalBest,
    /// The fastest completed lap of any driver
    OverallBest,
    /// Best lap of the driver on the same compound with the closest wear
    NearestTyre,
}

impl TargetKind {
    pub const ALL: [TargetKind; 4] = [
        TargetKind::PreviousLap,
        TargetKind::PersonalBest,
        TargetKind::OverallBest,
        TargetKind::NearestTyre,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TargetKind::PreviousLap => "Last Lap",
            TargetKind::PersonalBest => "Personal Best Lap",
            TargetKind::OverallBest => "Overall Best Lap",
            TargetKind::NearestTyre => "Closest Tyre",
        }
    }
}

/// Comparison against one reference lap.
///
/// A `diff_ms` of 0 with `predicted_ms == None` means no comparison is
/// possible yet, which is not the same as being level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TargetDelta {
    pub kind: TargetKind,
    /// Car the reference lap belongs to
    pub car_index: usize,
    pub driver_name: Option<String>,
    pub lap_number: u8,
    /// Positive when the local driver is slower
    pub diff_ms: i32,
    /// Per sector, 0 where either side has no time for that sector
    pub sector_diffs_ms: [i32; 3],
    /// Interpolated elapsed time of the reference lap at the local driver's distance
    pub predicted_ms: Option<u32>,
    pub reference_lap_time_ms: Option<u32>,
    pub reference_sectors_ms: [u32; 3],
}

impl TargetDelta {
    pub fn has_comparison(&self) -> bool {
        self.predicted_ms.is_some()
    }
}

/// Last lap of the car directly ahead of or behind the local driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct NeighbourLap {
    pub car_index: usize,
    pub car_position: u8,
    pub driver_name: Option<String>,
    pub last_lap_time_ms: u32,
    /// Local last lap minus theirs, 0 when either is unknown
    pub diff_ms: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TyreStatus {
    pub compound: u8,
    pub wear_pct: f32,
    pub life_span: u8,
    pub age_laps: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct FuelStatus {
    pub in_tank: f32,
    pub remaining_laps: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionConditions {
    pub weather_code: u8,
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub session_type: u8,
    pub time_left_secs: u16,
    pub duration_secs: u16,
    pub pit_window_ideal_lap: u8,
    pub pit_window_latest_lap: u8,
    pub pit_rejoin_position: u8,
}

/// Everything the presentation layer renders for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DeltaSnapshot {
    pub session_uid: u64,
    pub car_index: usize,
    pub lap_number: u8,
    pub lap_distance: f32,
    pub current_lap_time_ms: u32,
    pub last_lap_time_ms: u32,
    pub current_sectors_ms: [u32; 3],
    /// Available comparisons, in [`TargetKind::ALL`] order
    pub targets: Vec<TargetDelta>,
    pub ahead: Option<NeighbourLap>,
    pub behind: Option<NeighbourLap>,
    pub tyres: Option<TyreStatus>,
    pub fuel: Option<FuelStatus>,
    pub conditions: Option<SessionConditions>,
    pub weather_changes: Vec<WeatherChange>,
}

impl DeltaSnapshot {
    pub fn target(&self, kind: TargetKind) -> Option<&TargetDelta> {
        self.targets.iter().find(|target| target.kind == kind)
    }

    pub fn current_lap_time(&self) -> LapTime {
        LapTime::from_ms(self.current_lap_time_ms)
    }
}

impl std::fmt::Display for DeltaSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lap {} {}", self.lap_number, self.current_lap_time())?;
        for target in &self.targets {
            write!(f, " | Δ {}: ", target.kind.label())?;
            if target.has_comparison() {
                write!(f, "{}", LapTime::from_ms(target.diff_ms))?;
            } else {
                f.write_str("--")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(kind: TargetKind, predicted_ms: Option<u32>, diff_ms: i32) -> TargetDelta {
        TargetDelta {
            kind,
            car_index: 0,
            driver_name: None,
            lap_number: 1,
            diff_ms,
            sector_diffs_ms: [0; 3],
            predicted_ms,
            reference_lap_time_ms: None,
            reference_sectors_ms: [0; 3],
        }
    }

    #[test]
    fn display_distinguishes_no_data_from_level() {
        let snapshot = DeltaSnapshot {
            session_uid: 1,
            car_index: 0,
            lap_number: 3,
            lap_distance: 150.0,
            current_lap_time_ms: 21_000,
            last_lap_time_ms: 0,
            current_sectors_ms: [0; 3],
            targets: vec![
                target(TargetKind::PreviousLap, Some(15_000), 6_000),
                target(TargetKind::PersonalBest, None, 0),
            ],
            ahead: None,
            behind: None,
            tyres: None,
            fuel: None,
            conditions: None,
            weather_changes: vec![],
        };

        let text = snapshot.to_string();
        assert!(text.contains("Δ Last Lap: 06.000"));
        assert!(text.contains("Δ Personal Best Lap: --"));
        assert!(snapshot.target(TargetKind::OverallBest).is_none());
    }
}
