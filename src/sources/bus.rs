//! In-process event bus: one bounded channel per event type
//!
//! Producers hold an [`EventPublisher`] and push decoded events; the engine
//! consumes them through the matching [`EventSubscriber`]. Event types are
//! independent channels, so ordering holds per type only.

use tokio::sync::mpsc;
use tracing::trace;

use crate::source::EventSource;
use crate::types::{
    EventKind, PacketCarStatusData, PacketLapData, PacketParticipantsData, PacketSessionData,
    PacketSessionHistoryData, PacketTyreSetsData, TelemetryEvent,
};
use crate::{DeltaError, Result};

/// Constructor for a publisher/subscriber pair
pub struct EventBus;

impl EventBus {
    /// Create a bus with `capacity` slots per event type
    pub fn channel(capacity: usize) -> (EventPublisher, EventSubscriber) {
        let capacity = capacity.max(1);
        let (lap_data_tx, lap_data) = mpsc::channel(capacity);
        let (history_tx, history) = mpsc::channel(capacity);
        let (tyre_sets_tx, tyre_sets) = mpsc::channel(capacity);
        let (participants_tx, participants) = mpsc::channel(capacity);
        let (session_tx, session) = mpsc::channel(capacity);
        let (car_status_tx, car_status) = mpsc::channel(capacity);

        let publisher = EventPublisher {
            lap_data: lap_data_tx,
            history: history_tx,
            tyre_sets: tyre_sets_tx,
            participants: participants_tx,
            session: session_tx,
            car_status: car_status_tx,
        };
        let subscriber =
            EventSubscriber { lap_data, history, tyre_sets, participants, session, car_status };
        (publisher, subscriber)
    }
}

/// Sending half of the bus
#[derive(Clone)]
pub struct EventPublisher {
    lap_data: mpsc::Sender<PacketLapData>,
    history: mpsc::Sender<PacketSessionHistoryData>,
    tyre_sets: mpsc::Sender<PacketTyreSetsData>,
    participants: mpsc::Sender<PacketParticipantsData>,
    session: mpsc::Sender<PacketSessionData>,
    car_status: mpsc::Sender<PacketCarStatusData>,
}

fn closed(kind: EventKind) -> DeltaError {
    DeltaError::ChannelClosed { kind: kind.to_string() }
}

impl EventPublisher {
    /// Route an event to its channel, waiting while that channel is full
    pub async fn publish(&self, event: TelemetryEvent) -> Result<()> {
        let kind = event.kind();
        trace!(%kind, "Publishing event");
        let sent = match event {
            TelemetryEvent::LapData(p) => self.lap_data.send(p).await.is_ok(),
            TelemetryEvent::SessionHistory(p) => self.history.send(p).await.is_ok(),
            TelemetryEvent::TyreSets(p) => self.tyre_sets.send(p).await.is_ok(),
            TelemetryEvent::Participants(p) => self.participants.send(p).await.is_ok(),
            TelemetryEvent::Session(p) => self.session.send(p).await.is_ok(),
            TelemetryEvent::CarStatus(p) => self.car_status.send(p).await.is_ok(),
        };
        if sent { Ok(()) } else { Err(closed(kind)) }
    }

    /// Publish a relay record by wire name; unknown event types are skipped
    pub async fn publish_record(&self, kind: &str, data: serde_json::Value) -> Result<()> {
        match TelemetryEvent::from_record(kind, data)? {
            Some(event) => self.publish(event).await,
            None => {
                trace!(kind, "Skipping unsupported event type");
                Ok(())
            }
        }
    }

    /// Whether the subscriber has gone away
    pub fn is_closed(&self) -> bool {
        self.lap_data.is_closed()
    }
}

/// Receiving half of the bus
pub struct EventSubscriber {
    lap_data: mpsc::Receiver<PacketLapData>,
    history: mpsc::Receiver<PacketSessionHistoryData>,
    tyre_sets: mpsc::Receiver<PacketTyreSetsData>,
    participants: mpsc::Receiver<PacketParticipantsData>,
    session: mpsc::Receiver<PacketSessionData>,
    car_status: mpsc::Receiver<PacketCarStatusData>,
}

#[async_trait::async_trait]
impl EventSource for EventSubscriber {
    async fn next_event(&mut self) -> Result<Option<TelemetryEvent>> {
        let event = tokio::select! {
            Some(p) = self.lap_data.recv() => TelemetryEvent::LapData(p),
            Some(p) = self.history.recv() => TelemetryEvent::SessionHistory(p),
            Some(p) = self.tyre_sets.recv() => TelemetryEvent::TyreSets(p),
            Some(p) = self.participants.recv() => TelemetryEvent::Participants(p),
            Some(p) = self.session.recv() => TelemetryEvent::Session(p),
            Some(p) = self.car_status.recv() => TelemetryEvent::CarStatus(p),
            else => return Ok(None),
        };
        Ok(Some(event))
    }
}
