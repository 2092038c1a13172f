//! Turning session state into a delta snapshot

use super::selector::{DeltaTarget, RivalSelector};
use super::snapshot::{
    DeltaSnapshot, FuelStatus, NeighbourLap, SessionConditions, TargetDelta, TyreStatus,
};
use crate::session::SessionContext;
use crate::telemetry::{DriverState, predict};
use crate::types::WeatherChange;

/// Signed difference `a - b`, saturated to the `i32` range
pub fn signed_diff(a: u32, b: u32) -> i32 {
    let diff = i64::from(a) - i64::from(b);
    diff.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Per-sector differences; a sector with no time on either side reads 0
pub fn sector_diffs(current: [u32; 3], reference: [u32; 3]) -> [i32; 3] {
    std::array::from_fn(|i| {
        if current[i] == 0 || reference[i] == 0 { 0 } else { signed_diff(current[i], reference[i]) }
    })
}

/// Pure read of a [`SessionContext`] into a [`DeltaSnapshot`]
pub struct DeltaEngine;

impl DeltaEngine {
    /// Snapshot for the local driver, `None` until the local driver has lap data
    pub fn compute_snapshot(context: &SessionContext) -> Option<DeltaSnapshot> {
        let local = context.local_driver()?;
        if local.current_lap_number == 0 {
            return None;
        }

        let current_sectors = local.current_sector_times();
        let targets = RivalSelector::new(&context.drivers)
            .targets(local)
            .into_iter()
            .map(|target| Self::target_delta(context, local, current_sectors, target))
            .collect();

        Some(DeltaSnapshot {
            session_uid: context.session_uid,
            car_index: local.index,
            lap_number: local.current_lap_number,
            lap_distance: local.current_distance,
            current_lap_time_ms: local.current_elapsed_ms,
            last_lap_time_ms: local.last_lap_time_ms,
            current_sectors_ms: current_sectors,
            targets,
            ahead: local
                .car_position
                .checked_sub(1)
                .and_then(|position| Self::neighbour(context, local, position)),
            behind: local
                .car_position
                .checked_add(1)
                .and_then(|position| Self::neighbour(context, local, position)),
            tyres: Self::tyre_status(context, local),
            fuel: Self::fuel_status(context, local),
            conditions: Self::conditions(context),
            weather_changes: context
                .session
                .as_ref()
                .map(WeatherChange::from_forecast)
                .unwrap_or_default(),
        })
    }

    fn target_delta(
        context: &SessionContext,
        local: &DriverState,
        current_sectors: [u32; 3],
        target: DeltaTarget<'_>,
    ) -> TargetDelta {
        let lap = target.source_lap;
        let predicted_ms = predict(&lap.samples, local.current_distance);
        let diff_ms = predicted_ms.map_or(0, |p| signed_diff(local.current_elapsed_ms, p));

        TargetDelta {
            kind: target.kind,
            car_index: target.car_index,
            driver_name: context.driver_name(target.car_index),
            lap_number: lap.lap_number,
            diff_ms,
            sector_diffs_ms: sector_diffs(current_sectors, lap.sector_ms),
            predicted_ms,
            reference_lap_time_ms: lap.is_complete().then_some(lap.total_ms),
            reference_sectors_ms: lap.sector_ms,
        }
    }

    fn neighbour(
        context: &SessionContext,
        local: &DriverState,
        position: u8,
    ) -> Option<NeighbourLap> {
        let other = context.drivers.at_position(position)?;
        if other.index == local.index {
            return None;
        }
        let diff_ms = if local.last_lap_time_ms == 0 || other.last_lap_time_ms == 0 {
            0
        } else {
            signed_diff(local.last_lap_time_ms, other.last_lap_time_ms)
        };

        Some(NeighbourLap {
            car_index: other.index,
            car_position: position,
            driver_name: context.driver_name(other.index),
            last_lap_time_ms: other.last_lap_time_ms,
            diff_ms,
        })
    }

    fn tyre_status(context: &SessionContext, local: &DriverState) -> Option<TyreStatus> {
        let tyres = local.tyres?;
        let age_laps = context
            .car_status
            .as_ref()
            .and_then(|status| status.car_status_data.get(local.index))
            .map(|status| status.tyres_age_laps);

        Some(TyreStatus {
            compound: tyres.compound,
            wear_pct: tyres.wear_pct,
            life_span: tyres.life_span,
            age_laps,
        })
    }

    fn fuel_status(context: &SessionContext, local: &DriverState) -> Option<FuelStatus> {
        let status = context.car_status.as_ref()?.car_status_data.get(local.index)?;
        Some(FuelStatus {
            in_tank: status.fuel_in_tank,
            remaining_laps: status.fuel_remaining_laps,
        })
    }

    fn conditions(context: &SessionContext) -> Option<SessionConditions> {
        let session = context.session.as_ref()?;
        Some(SessionConditions {
            weather_code: session.weather,
            track_temperature: session.track_temperature,
            air_temperature: session.air_temperature,
            session_type: session.session_type,
            time_left_secs: session.session_time_left,
            duration_secs: session.session_duration,
            pit_window_ideal_lap: session.pit_stop_window_ideal_lap,
            pit_window_latest_lap: session.pit_stop_window_latest_lap,
            pit_rejoin_position: session.pit_stop_rejoin_position,
        })
    }
}
