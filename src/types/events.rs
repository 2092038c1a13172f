//! Typed telemetry events consumed from the external packet decoder.
//!
//! The shapes mirror the game's UDP packets as they appear after decoding to
//! JSON: packet fields keep their `m_` prefixed names, header fields are
//! snake case. Every struct tolerates missing fields so that a relay built
//! against a slightly different game year still decodes.

use serde::{Deserialize, Serialize};

use crate::serde_utils::u64_from_number_or_string;
use crate::{DeltaError, Result};

/// Common header carried by every packet.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_year: u8,
    /// Unique identifier of the session the packet belongs to
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    /// Index of the local driver's car in per-car arrays
    pub player_car_index: u8,
}

/// Game's zero-based sector index, normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Sector {
    First,
    Second,
    Third,
}

impl Sector {
    /// Decode the raw sector value. Anything past the second sector is the
    /// final sector; some decoders report it as 3 instead of 2.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Sector::First,
            1 => Sector::Second,
            _ => Sector::Third,
        }
    }
}

fn sector_time_ms(minutes: u8, millis: u16) -> u32 {
    u32::from(minutes) * 60_000 + u32::from(millis)
}

/// Per-car lap progress.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct LapData {
    #[serde(rename = "m_lastLapTimeInMS")]
    pub last_lap_time_ms: u32,
    #[serde(rename = "m_currentLapTimeInMS")]
    pub current_lap_time_ms: u32,
    #[serde(rename = "m_sector1TimeInMS")]
    pub sector1_time_in_ms: u16,
    #[serde(rename = "m_sector1TimeMinutes")]
    pub sector1_time_minutes: u8,
    #[serde(rename = "m_sector2TimeInMS")]
    pub sector2_time_in_ms: u16,
    #[serde(rename = "m_sector2TimeMinutes")]
    pub sector2_time_minutes: u8,
    /// Meters travelled since the start line; negative before the first crossing
    #[serde(rename = "m_lapDistance")]
    pub lap_distance: f32,
    #[serde(rename = "m_carPosition")]
    pub car_position: u8,
    #[serde(rename = "m_currentLapNum")]
    pub current_lap_num: u8,
    #[serde(rename = "m_pitStatus")]
    pub pit_status: u8,
    #[serde(rename = "m_sector")]
    pub sector: u8,
    #[serde(rename = "m_currentLapInvalid")]
    pub current_lap_invalid: u8,
    #[serde(rename = "m_resultStatus")]
    pub result_status: u8,
}

impl LapData {
    /// Sector 1 time of the lap in progress, 0 until the sector is complete
    pub fn sector1_ms(&self) -> u32 {
        sector_time_ms(self.sector1_time_minutes, self.sector1_time_in_ms)
    }

    /// Sector 2 time of the lap in progress, 0 until the sector is complete
    pub fn sector2_ms(&self) -> u32 {
        sector_time_ms(self.sector2_time_minutes, self.sector2_time_in_ms)
    }

    pub fn current_sector(&self) -> Sector {
        Sector::from_raw(self.sector)
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketLapData {
    pub m_header: PacketHeader,
    #[serde(rename = "m_lapData")]
    pub lap_data: Vec<LapData>,
}

/// One completed (or in-progress) lap in a car's session history.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct LapHistoryData {
    #[serde(rename = "m_lapTimeInMS")]
    pub lap_time_ms: u32,
    #[serde(rename = "m_sector1TimeInMS")]
    pub sector1_time_in_ms: u16,
    #[serde(rename = "m_sector1TimeMinutes")]
    pub sector1_time_minutes: u8,
    #[serde(rename = "m_sector2TimeInMS")]
    pub sector2_time_in_ms: u16,
    #[serde(rename = "m_sector2TimeMinutes")]
    pub sector2_time_minutes: u8,
    #[serde(rename = "m_sector3TimeInMS")]
    pub sector3_time_in_ms: u16,
    #[serde(rename = "m_sector3TimeMinutes")]
    pub sector3_time_minutes: u8,
    #[serde(rename = "m_lapValidBitFlags")]
    pub lap_valid_bit_flags: u8,
}

impl LapHistoryData {
    pub fn sector_times_ms(&self) -> [u32; 3] {
        [
            sector_time_ms(self.sector1_time_minutes, self.sector1_time_in_ms),
            sector_time_ms(self.sector2_time_minutes, self.sector2_time_in_ms),
            sector_time_ms(self.sector3_time_minutes, self.sector3_time_in_ms),
        ]
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketSessionHistoryData {
    pub m_header: PacketHeader,
    #[serde(rename = "m_carIdx")]
    pub car_idx: u8,
    #[serde(rename = "m_numLaps")]
    pub num_laps: u8,
    #[serde(rename = "m_bestLapTimeLapNum")]
    pub best_lap_time_lap_num: u8,
    #[serde(rename = "m_lapHistoryData")]
    pub lap_history_data: Vec<LapHistoryData>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct TyreSetData {
    #[serde(rename = "m_actualTyreCompound")]
    pub actual_tyre_compound: u8,
    #[serde(rename = "m_visualTyreCompound")]
    pub visual_tyre_compound: u8,
    /// Wear percentage
    #[serde(rename = "m_wear")]
    pub wear: u8,
    #[serde(rename = "m_available")]
    pub available: u8,
    #[serde(rename = "m_lifeSpan")]
    pub life_span: u8,
    #[serde(rename = "m_usableLife")]
    pub usable_life: u8,
    #[serde(rename = "m_fitted")]
    pub fitted: u8,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketTyreSetsData {
    pub m_header: PacketHeader,
    #[serde(rename = "m_carIdx")]
    pub car_idx: u8,
    #[serde(rename = "m_tyreSetData")]
    pub tyre_set_data: Vec<TyreSetData>,
    #[serde(rename = "m_fittedIdx")]
    pub fitted_idx: u8,
}

impl PacketTyreSetsData {
    /// The set currently on the car, if the index points into the list
    pub fn fitted(&self) -> Option<&TyreSetData> {
        self.tyre_set_data.get(usize::from(self.fitted_idx))
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct ParticipantData {
    #[serde(rename = "m_aiControlled")]
    pub ai_controlled: u8,
    #[serde(rename = "m_driverId")]
    pub driver_id: u8,
    #[serde(rename = "m_teamId")]
    pub team_id: u8,
    #[serde(rename = "m_raceNumber")]
    pub race_number: u8,
    #[serde(rename = "m_name")]
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketParticipantsData {
    pub m_header: PacketHeader,
    #[serde(rename = "m_numActiveCars")]
    pub num_active_cars: u8,
    #[serde(rename = "m_participants")]
    pub participants: Vec<ParticipantData>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct WeatherForecastSample {
    #[serde(rename = "m_sessionType")]
    pub session_type: u8,
    /// Minutes into the session
    #[serde(rename = "m_timeOffset")]
    pub time_offset: u8,
    #[serde(rename = "m_weather")]
    pub weather: u8,
    #[serde(rename = "m_trackTemperature")]
    pub track_temperature: i8,
    #[serde(rename = "m_airTemperature")]
    pub air_temperature: i8,
    #[serde(rename = "m_rainPercentage")]
    pub rain_percentage: u8,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketSessionData {
    pub m_header: PacketHeader,
    #[serde(rename = "m_weather")]
    pub weather: u8,
    #[serde(rename = "m_trackTemperature")]
    pub track_temperature: i8,
    #[serde(rename = "m_airTemperature")]
    pub air_temperature: i8,
    #[serde(rename = "m_totalLaps")]
    pub total_laps: u8,
    #[serde(rename = "m_trackLength")]
    pub track_length: u16,
    #[serde(rename = "m_sessionType")]
    pub session_type: u8,
    /// Seconds
    #[serde(rename = "m_sessionTimeLeft")]
    pub session_time_left: u16,
    /// Seconds
    #[serde(rename = "m_sessionDuration")]
    pub session_duration: u16,
    #[serde(rename = "m_numWeatherForecastSamples")]
    pub num_weather_forecast_samples: u8,
    #[serde(rename = "m_weatherForecastSamples")]
    pub weather_forecast_samples: Vec<WeatherForecastSample>,
    #[serde(rename = "m_pitStopWindowIdealLap")]
    pub pit_stop_window_ideal_lap: u8,
    #[serde(rename = "m_pitStopWindowLatestLap")]
    pub pit_stop_window_latest_lap: u8,
    #[serde(rename = "m_pitStopRejoinPosition")]
    pub pit_stop_rejoin_position: u8,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct CarStatusData {
    #[serde(rename = "m_fuel_in_tank")]
    pub fuel_in_tank: f32,
    #[serde(rename = "m_fuel_capacity")]
    pub fuel_capacity: f32,
    #[serde(rename = "m_fuel_remaining_laps")]
    pub fuel_remaining_laps: f32,
    #[serde(rename = "m_actual_tyre_compound")]
    pub actual_tyre_compound: u8,
    #[serde(rename = "m_visual_tyre_compound")]
    pub visual_tyre_compound: u8,
    #[serde(rename = "m_tyres_age_laps")]
    pub tyres_age_laps: u8,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default)]
pub struct PacketCarStatusData {
    pub m_header: PacketHeader,
    #[serde(rename = "m_car_status_data")]
    pub car_status_data: Vec<CarStatusData>,
}

/// Event type names as used by the decoder and relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    LapData,
    SessionHistory,
    TyreSets,
    Participants,
    Session,
    CarStatus,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::LapData,
        EventKind::SessionHistory,
        EventKind::TyreSets,
        EventKind::Participants,
        EventKind::Session,
        EventKind::CarStatus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::LapData => "lapData",
            EventKind::SessionHistory => "sessionHistory",
            EventKind::TyreSets => "tyreSets",
            EventKind::Participants => "participants",
            EventKind::Session => "session",
            EventKind::CarStatus => "carStatus",
        }
    }

    /// Look up a kind by its wire name; `None` for event types this crate
    /// does not consume.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum TelemetryEvent {
    LapData(PacketLapData),
    SessionHistory(PacketSessionHistoryData),
    TyreSets(PacketTyreSetsData),
    Participants(PacketParticipantsData),
    Session(PacketSessionData),
    CarStatus(PacketCarStatusData),
}

impl TelemetryEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TelemetryEvent::LapData(_) => EventKind::LapData,
            TelemetryEvent::SessionHistory(_) => EventKind::SessionHistory,
            TelemetryEvent::TyreSets(_) => EventKind::TyreSets,
            TelemetryEvent::Participants(_) => EventKind::Participants,
            TelemetryEvent::Session(_) => EventKind::Session,
            TelemetryEvent::CarStatus(_) => EventKind::CarStatus,
        }
    }

    pub fn header(&self) -> &PacketHeader {
        match self {
            TelemetryEvent::LapData(p) => &p.m_header,
            TelemetryEvent::SessionHistory(p) => &p.m_header,
            TelemetryEvent::TyreSets(p) => &p.m_header,
            TelemetryEvent::Participants(p) => &p.m_header,
            TelemetryEvent::Session(p) => &p.m_header,
            TelemetryEvent::CarStatus(p) => &p.m_header,
        }
    }

    pub fn session_uid(&self) -> u64 {
        self.header().session_uid
    }

    /// Decode the payload of a relay record of the given kind.
    pub fn from_payload(kind: EventKind, data: serde_json::Value) -> Result<Self> {
        let event = match kind {
            EventKind::LapData => TelemetryEvent::LapData(serde_json::from_value(data)?),
            EventKind::SessionHistory => {
                TelemetryEvent::SessionHistory(serde_json::from_value(data)?)
            }
            EventKind::TyreSets => TelemetryEvent::TyreSets(serde_json::from_value(data)?),
            EventKind::Participants => TelemetryEvent::Participants(serde_json::from_value(data)?),
            EventKind::Session => TelemetryEvent::Session(serde_json::from_value(data)?),
            EventKind::CarStatus => TelemetryEvent::CarStatus(serde_json::from_value(data)?),
        };
        Ok(event)
    }

    /// Decode a relay record given its wire type name.
    pub fn from_record(kind: &str, data: serde_json::Value) -> Result<Option<Self>> {
        match EventKind::from_wire(kind) {
            Some(kind) => Self::from_payload(kind, data).map(Some).map_err(|e| match e {
                DeltaError::Parse { details, .. } => {
                    DeltaError::parse_error(format!("{} record", kind), details)
                }
                other => other,
            }),
            None => Ok(None),
        }
    }
}
