//! Core types crossing the crate's boundaries.
//!
//! - [`TelemetryEvent`] and the packet structs are what the external decoder
//!   hands us, one variant per event type
//! - [`LapTime`] formats millisecond values for display
//! - [`Weather`] and [`WeatherChange`] describe the session forecast
//! - [`UpdateRate`] controls how often snapshots reach a consumer

pub mod events;
mod lap_time;
mod update_rate;
mod weather;

pub use events::{
    CarStatusData, EventKind, LapData, LapHistoryData, PacketCarStatusData, PacketHeader,
    PacketLapData, PacketParticipantsData, PacketSessionData, PacketSessionHistoryData,
    PacketTyreSetsData, ParticipantData, Sector, TelemetryEvent, TyreSetData,
    WeatherForecastSample,
};
pub use lap_time::LapTime;
pub use update_rate::UpdateRate;
pub use weather::{Weather, WeatherChange};
