//! Session lifecycle: all state derived from one game session
//!
//! A [`SessionContext`] lives exactly as long as its session identifier.
//! When lap data arrives carrying a different identifier, the context is
//! dropped and rebuilt from empty; nothing carries over between sessions.

use tracing::{debug, info, trace};

use crate::analysis::{DeltaEngine, DeltaSnapshot};
use crate::config::SampleRetention;
use crate::telemetry::{DriverArena, DriverState, FittedTyres, MAX_CARS};
use crate::types::{
    PacketCarStatusData, PacketLapData, PacketParticipantsData, PacketSessionData,
    PacketSessionHistoryData, PacketTyreSetsData, TelemetryEvent,
};

/// Everything known about the current session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_uid: u64,
    pub drivers: DriverArena,
    /// `None` until lap data names a local car inside the grid
    pub local_car_index: Option<usize>,
    pub participants: Option<PacketParticipantsData>,
    pub session: Option<PacketSessionData>,
    pub car_status: Option<PacketCarStatusData>,
    retention: SampleRetention,
}

impl SessionContext {
    pub fn new(session_uid: u64, retention: SampleRetention) -> Self {
        Self {
            session_uid,
            drivers: DriverArena::new(),
            local_car_index: None,
            participants: None,
            session: None,
            car_status: None,
            retention,
        }
    }

    pub fn local_driver(&self) -> Option<&DriverState> {
        self.local_car_index.and_then(|index| self.drivers.get(index))
    }

    /// Participant name for a car, when participants data has arrived
    pub fn driver_name(&self, car_index: usize) -> Option<String> {
        self.participants
            .as_ref()
            .and_then(|p| p.participants.get(car_index))
            .map(|participant| participant.name.clone())
            .filter(|name| !name.is_empty())
    }

    fn apply_lap_data(&mut self, packet: &PacketLapData) {
        self.drivers.grow_to(packet.lap_data.len().max(MAX_CARS));

        for (index, entry) in packet.lap_data.iter().enumerate() {
            let Some(driver) = self.drivers.get_mut(index) else {
                continue;
            };
            let lap_before = driver.current_lap_number;
            if !driver.apply_lap_data(entry) {
                continue;
            }
            if driver.current_lap_number > lap_before
                && self.retention == SampleRetention::ReferenceLaps
            {
                driver.release_stale_samples();
            }
            self.drivers.record(
                index,
                entry.current_lap_num,
                entry.lap_distance,
                entry.current_lap_time_ms,
            );
        }

        let local = usize::from(packet.m_header.player_car_index);
        self.local_car_index = (local < packet.lap_data.len()).then_some(local);
    }

    fn apply_session_history(&mut self, packet: &PacketSessionHistoryData) {
        match self.drivers.get_mut(usize::from(packet.car_idx)) {
            Some(driver) => driver.apply_history(&packet.lap_history_data),
            None => trace!(car = packet.car_idx, "Session history for car outside the grid"),
        }
    }

    fn apply_tyre_sets(&mut self, packet: &PacketTyreSetsData) {
        if let Some(driver) = self.drivers.get_mut(usize::from(packet.car_idx)) {
            match packet.fitted() {
                Some(set) => driver.tyres = Some(FittedTyres::from(set)),
                None => trace!(
                    car = packet.car_idx,
                    fitted = packet.fitted_idx,
                    "Fitted tyre index outside the tyre set list"
                ),
            }
        }
    }
}

/// Lifecycle of the session state
#[derive(Debug, Clone)]
pub enum SessionPhase {
    /// No lap data seen yet
    Uninitialized,
    Active(Box<SessionContext>),
}

/// Owner of all per-session state; the only writer is [`SessionState::apply`]
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: SessionPhase,
    retention: SampleRetention,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SampleRetention::default())
    }
}

impl SessionState {
    pub fn new(retention: SampleRetention) -> Self {
        Self { phase: SessionPhase::Uninitialized, retention }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn session_uid(&self) -> Option<u64> {
        self.context().map(|context| context.session_uid)
    }

    pub fn context(&self) -> Option<&SessionContext> {
        match &self.phase {
            SessionPhase::Active(context) => Some(context),
            SessionPhase::Uninitialized => None,
        }
    }

    /// Apply one event; lap data events produce a fresh snapshot.
    ///
    /// Only lap data starts a session or replaces one with a new
    /// identifier. Other events are dropped until the first lap data
    /// arrives, and whenever their identifier differs from the active
    /// session's, since the event types travel on independent channels.
    pub fn apply(&mut self, event: &TelemetryEvent) -> Option<DeltaSnapshot> {
        let uid = event.session_uid();
        let is_lap_data = matches!(event, TelemetryEvent::LapData(_));

        match &mut self.phase {
            SessionPhase::Active(context) if context.session_uid != uid => {
                if !is_lap_data {
                    trace!(
                        kind = %event.kind(),
                        session_uid = uid,
                        active = context.session_uid,
                        "Dropping event from another session"
                    );
                    return None;
                }
                debug!(
                    previous = context.session_uid,
                    next = uid,
                    "New session detected, discarding session state"
                );
                **context = SessionContext::new(uid, self.retention);
            }
            SessionPhase::Active(_) => {}
            SessionPhase::Uninitialized => {
                if !is_lap_data {
                    trace!(kind = %event.kind(), "Dropping event before first lap data");
                    return None;
                }
                info!(session_uid = uid, "Session started");
                self.phase = SessionPhase::Active(Box::new(SessionContext::new(uid, self.retention)));
            }
        }

        let SessionPhase::Active(context) = &mut self.phase else {
            return None;
        };

        match event {
            TelemetryEvent::LapData(packet) => {
                context.apply_lap_data(packet);
                return DeltaEngine::compute_snapshot(context);
            }
            TelemetryEvent::SessionHistory(packet) => context.apply_session_history(packet),
            TelemetryEvent::TyreSets(packet) => context.apply_tyre_sets(packet),
            TelemetryEvent::Participants(packet) => context.participants = Some(packet.clone()),
            TelemetryEvent::Session(packet) => context.session = Some(packet.clone()),
            TelemetryEvent::CarStatus(packet) => context.car_status = Some(packet.clone()),
        }
        None
    }
}
