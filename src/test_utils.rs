//! Packet builders shared by unit tests and benches
//!
//! Builders fill in only what lap delta computation reads; everything else
//! keeps its default.

#![cfg(any(test, feature = "benchmark"))]

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::types::{
    LapData, LapHistoryData, PacketHeader, PacketLapData, PacketSessionHistoryData,
    PacketTyreSetsData, TelemetryEvent, TyreSetData,
};

/// Header for `session_uid` with the local car at `player_car_index`
pub fn header(session_uid: u64, player_car_index: u8) -> PacketHeader {
    PacketHeader { session_uid, player_car_index, packet_format: 2023, ..Default::default() }
}

/// Lap data entry for a car `distance` meters and `elapsed_ms` into `lap`
pub fn lap_entry(lap: u8, distance: f32, elapsed_ms: u32) -> LapData {
    LapData {
        current_lap_num: lap,
        lap_distance: distance,
        current_lap_time_ms: elapsed_ms,
        ..Default::default()
    }
}

pub fn lap_packet(session_uid: u64, player_car_index: u8, entries: Vec<LapData>) -> TelemetryEvent {
    TelemetryEvent::LapData(PacketLapData {
        m_header: header(session_uid, player_car_index),
        lap_data: entries,
    })
}

pub fn session_history_packet(
    session_uid: u64,
    car_idx: u8,
    laps: Vec<LapHistoryData>,
) -> TelemetryEvent {
    TelemetryEvent::SessionHistory(PacketSessionHistoryData {
        m_header: header(session_uid, 0),
        car_idx,
        num_laps: u8::try_from(laps.len()).unwrap_or(u8::MAX),
        best_lap_time_lap_num: 0,
        lap_history_data: laps,
    })
}

/// Tyre sets for `car_idx` with a single fitted set
pub fn tyre_sets_packet(session_uid: u64, car_idx: u8, compound: u8, wear: u8) -> TelemetryEvent {
    TelemetryEvent::TyreSets(PacketTyreSetsData {
        m_header: header(session_uid, 0),
        car_idx,
        tyre_set_data: vec![TyreSetData {
            actual_tyre_compound: compound,
            visual_tyre_compound: compound,
            wear,
            available: 1,
            life_span: 20,
            usable_life: 20,
            fitted: 1,
        }],
        fitted_idx: 0,
    })
}

/// A full grid driving `laps` laps of a `track_length` meter circuit.
///
/// Car `i` laps in `base_lap_ms + i * 250` ms; each lap is split into
/// `ticks_per_lap` lap data events. Entering lap `n + 1` reports lap `n` as
/// the last lap time.
pub fn race_events(
    session_uid: u64,
    cars: usize,
    laps: u8,
    ticks_per_lap: u32,
    track_length: f32,
    base_lap_ms: u32,
) -> Vec<TelemetryEvent> {
    let lap_ms = |car: usize| base_lap_ms + 250 * car as u32;
    let mut events = Vec::with_capacity(usize::from(laps) * ticks_per_lap as usize);

    for lap in 1..=laps {
        for tick in 1..=ticks_per_lap {
            let progress = tick as f32 / ticks_per_lap as f32;
            let entries = (0..cars)
                .map(|car| LapData {
                    last_lap_time_ms: if lap > 1 { lap_ms(car) } else { 0 },
                    car_position: u8::try_from(car + 1).unwrap_or(u8::MAX),
                    sector: (progress * 3.0).min(2.0) as u8,
                    ..lap_entry(lap, progress * track_length, lap_ms(car) * tick / ticks_per_lap)
                })
                .collect();
            events.push(lap_packet(session_uid, 0, entries));
        }
    }
    events
}

/// Render events as a relay log, one `{timestamp, type, data}` record per line
pub fn event_log_lines(events: &[TelemetryEvent]) -> Vec<String> {
    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let mut record = serde_json::to_value(event).unwrap_or_default();
            if let Some(object) = record.as_object_mut() {
                object.insert("timestamp".into(), json!(1_700_000_000_000u64 + i as u64 * 16));
            }
            record.to_string()
        })
        .collect()
}

/// Write a relay log to a fresh file under the system temp directory
pub fn write_event_log(name: &str, lines: &[String]) -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("lapdelta-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(path)
}

/// Remove a log written by [`write_event_log`]
pub fn remove_event_log(path: &Path) {
    let _ = std::fs::remove_file(path);
}
