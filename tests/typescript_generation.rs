//! TypeScript Generation Tests
//!
//! Validates that the types handed to a presentation layer can be exported
//! to TypeScript when the tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_snapshot_types_implement_specta_type() {
    use specta::Type;

    fn assert_type<T: Type>() {}

    // Outbound snapshot
    assert_type::<lapdelta::DeltaSnapshot>();
    assert_type::<lapdelta::TargetDelta>();
    assert_type::<lapdelta::TargetKind>();
    assert_type::<lapdelta::NeighbourLap>();
    assert_type::<lapdelta::TyreStatus>();
    assert_type::<lapdelta::FuelStatus>();
    assert_type::<lapdelta::SessionConditions>();
    assert_type::<lapdelta::WeatherChange>();
    assert_type::<lapdelta::LapTime>();
    assert_type::<lapdelta::UpdateRate>();

    // Inbound events
    assert_type::<lapdelta::TelemetryEvent>();
    assert_type::<lapdelta::PacketLapData>();
    assert_type::<lapdelta::PacketSessionData>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Types still compile without specta::Type
    let _ = lapdelta::UpdateRate::Native;
    let _ = lapdelta::TargetKind::ALL;
}
