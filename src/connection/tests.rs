//! Connection tests over the bus and replay sources

use super::*;
use crate::analysis::TargetKind;
use crate::test_utils::{
    event_log_lines, lap_entry, lap_packet, race_events, remove_event_log, write_event_log,
};
use futures::StreamExt;
use tracing::info;

const UID: u64 = 0x5EED;

#[tokio::test]
async fn bus_delivers_snapshot_per_lap_tick() {
    let _ = tracing_subscriber::fmt::try_init();

    let (publisher, connection) = DeltaConnection::bus(&EngineConfig::default()).unwrap();
    assert!(connection.latest().is_none());

    let mut stream = Box::pin(connection.snapshots(UpdateRate::Native));
    publisher.publish(lap_packet(UID, 0, vec![lap_entry(1, 10.0, 800)])).await.unwrap();

    let snapshot = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("snapshot within a second")
        .expect("stream open");
    assert_eq!(snapshot.session_uid, UID);
    assert_eq!(snapshot.current_lap_time_ms, 800);
    assert_eq!(connection.latest().map(|s| s.current_lap_time_ms), Some(800));
}

#[tokio::test]
async fn stream_ends_when_publishers_are_gone() {
    let (publisher, connection) = DeltaConnection::bus(&EngineConfig::default()).unwrap();
    for event in race_events(UID, 4, 2, 20, 5_000.0, 90_000) {
        publisher.publish(event).await.unwrap();
    }
    drop(publisher);

    tokio::time::timeout(Duration::from_secs(5), connection.finished()).await.unwrap();
    assert!(!connection.is_running());

    let latest = connection.latest().unwrap();
    assert_eq!(latest.lap_number, 2);
    let previous = latest.target(TargetKind::PreviousLap).unwrap();
    assert_eq!(previous.reference_lap_time_ms, Some(90_000));
    assert_eq!(previous.diff_ms, 0);

    // A late subscriber still gets the final snapshot, then the end
    let collected: Vec<_> = connection.snapshots(UpdateRate::Native).collect().await;
    assert_eq!(collected.len(), 1);
}

#[tokio::test]
async fn throttled_subscription_keeps_latest() {
    let config = EngineConfig { snapshot_rate: UpdateRate::Max(5), ..Default::default() };
    let (publisher, connection) = DeltaConnection::bus(&config).unwrap();
    let stream = connection.snapshot_updates();

    let events = race_events(UID, 2, 1, 30, 5_000.0, 90_000);
    for event in events {
        publisher.publish(event).await.unwrap();
    }
    drop(publisher);

    let collected: Vec<_> =
        tokio::time::timeout(Duration::from_secs(5), stream.collect()).await.unwrap();
    info!(delivered = collected.len(), "Throttled delivery");
    assert!(!collected.is_empty());
    assert!(collected.len() < 30);
    assert_eq!(collected.last().map(|s| s.current_lap_time_ms), Some(90_000));
}

#[tokio::test]
async fn dropping_connection_stops_engine() {
    let (publisher, connection) = DeltaConnection::bus(&EngineConfig::default()).unwrap();
    drop(connection);

    tokio::time::timeout(Duration::from_secs(1), async {
        while !publisher.is_closed() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("engine released the bus");
}

#[tokio::test]
async fn first_snapshot_times_out_without_lap_data() {
    let (_publisher, connection) = DeltaConnection::bus(&EngineConfig::default()).unwrap();
    let err = connection.first_snapshot(Duration::from_millis(20)).await.unwrap_err();
    assert!(matches!(err, DeltaError::Timeout { .. }));
}

#[tokio::test]
async fn replay_opens_with_snapshot_ready() {
    let events = race_events(UID, 3, 3, 12, 4_800.0, 88_000);
    let path = write_event_log("connection-replay.jsonl", &event_log_lines(&events)).unwrap();

    let connection = DeltaConnection::open_replay(&path, &EngineConfig::default()).await.unwrap();
    assert!(connection.latest().is_some());

    connection.finished().await;
    let latest = connection.latest().unwrap();
    assert_eq!(latest.lap_number, 3);
    assert_eq!(latest.targets.len(), 3, "no tyre data, so no nearest tyre target");

    remove_event_log(&path);
}

#[tokio::test]
async fn replay_of_missing_file_fails() {
    let result = DeltaConnection::open_replay("/no/such/replay.jsonl", &EngineConfig::default()).await;
    assert!(matches!(result, Err(DeltaError::File { .. })));
}
